//! Seeing Core — configuration, error taxonomy, data model, pipeline states.

pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use config::{OrchestratorConfig, ServiceUrls, TimeoutConfig};
pub use error::{Error, Result, Service};
pub use state::PipelineState;
pub use types::*;
