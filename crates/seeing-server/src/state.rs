//! Shared application state.

use seeing_core::OrchestratorConfig;
use seeing_pipeline::Orchestrator;

/// Shared application state accessible from all route handlers.
///
/// Built once at startup; nothing in here changes per request.
pub struct AppState {
    pub config: OrchestratorConfig,
    pub orchestrator: Orchestrator,
}

impl AppState {
    /// State wired to the HTTP collaborators named in `config`.
    pub fn new(config: OrchestratorConfig) -> seeing_core::Result<Self> {
        let orchestrator = Orchestrator::from_config(&config)?;
        Ok(Self::with_orchestrator(config, orchestrator))
    }

    pub fn with_orchestrator(config: OrchestratorConfig, orchestrator: Orchestrator) -> Self {
        Self {
            config,
            orchestrator,
        }
    }
}
