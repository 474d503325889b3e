//! Per-request state tracking.

use tracing::{debug, error};

use seeing_core::PipelineState;

/// Records the states one request passes through.
#[derive(Debug)]
pub struct PipelineRun {
    current: PipelineState,
    history: Vec<PipelineState>,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRun {
    pub fn new() -> Self {
        Self {
            current: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn current(&self) -> PipelineState {
        self.current
    }

    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Move to `next`. Illegal transitions are logged and still recorded.
    pub fn advance(&mut self, next: PipelineState) {
        let legal = self.current.can_advance_to(next);
        if !legal {
            error!(from = %self.current, to = %next, "Illegal pipeline transition");
        }
        debug_assert!(legal, "illegal transition {} -> {}", self.current, next);
        debug!(from = %self.current, to = %next, "Pipeline state");
        self.current = next;
        self.history.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seeing_core::PipelineState::*;

    #[test]
    fn test_records_history() {
        let mut run = PipelineRun::new();
        run.advance(Uploading);
        run.advance(Failed);
        assert_eq!(run.current(), Failed);
        assert_eq!(run.history(), &[Idle, Uploading, Failed]);
    }
}
