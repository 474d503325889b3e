//! Pipeline state machine.

/// Where a single request is in the stage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Uploading,
    Describing,
    DetectingLandmark,
    Synthesizing,
    CleaningUp,
    Succeeded,
    Failed,
}

impl PipelineState {
    /// Whether `next` is a legal successor of `self`.
    ///
    /// Once an upload has succeeded every path goes through `CleaningUp`;
    /// only `Idle` and `Uploading` may fail directly. `DetectingLandmark`
    /// has no failure edge.
    pub fn can_advance_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, Uploading)
                | (Idle, Failed)
                | (Uploading, Describing)
                | (Uploading, Failed)
                | (Describing, DetectingLandmark)
                | (Describing, CleaningUp)
                | (DetectingLandmark, Synthesizing)
                | (Synthesizing, CleaningUp)
                | (CleaningUp, Succeeded)
                | (CleaningUp, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Succeeded | PipelineState::Failed)
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Describing => "describing",
            Self::DetectingLandmark => "detecting_landmark",
            Self::Synthesizing => "synthesizing",
            Self::CleaningUp => "cleaning_up",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::PipelineState::*;

    #[test]
    fn test_happy_path_is_legal() {
        let path = [
            Idle,
            Uploading,
            Describing,
            DetectingLandmark,
            Synthesizing,
            CleaningUp,
            Succeeded,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_failure_after_upload_goes_through_cleanup() {
        for state in [Describing, DetectingLandmark, Synthesizing] {
            assert!(!state.can_advance_to(Failed), "{} must clean up first", state);
            assert!(!state.can_advance_to(Succeeded));
        }
        assert!(Uploading.can_advance_to(Failed));
        assert!(CleaningUp.can_advance_to(Failed));
    }

    #[test]
    fn test_landmark_stage_has_single_exit() {
        assert!(DetectingLandmark.can_advance_to(Synthesizing));
        assert!(!DetectingLandmark.can_advance_to(CleaningUp));
    }

    #[test]
    fn test_terminal_states() {
        assert!(Succeeded.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!CleaningUp.is_terminal());
    }
}
