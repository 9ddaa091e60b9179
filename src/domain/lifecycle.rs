//! Submission lifecycle state machine
//!
//! ```text
//! Idle --begin_submit--> Submitting --complete--> Submitted (terminal)
//!                        Submitting --fail------> Idle
//! ```

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Submitted,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Illegal transition '{action}' from state {from:?}")]
pub struct LifecycleError {
    pub from: SubmissionState,
    pub action: &'static str,
}

impl SubmissionState {
    pub fn begin_submit(self) -> Result<Self, LifecycleError> {
        match self {
            Self::Idle => Ok(Self::Submitting),
            from => Err(LifecycleError {
                from,
                action: "begin_submit",
            }),
        }
    }

    pub fn complete(self) -> Result<Self, LifecycleError> {
        match self {
            Self::Submitting => Ok(Self::Submitted),
            from => Err(LifecycleError {
                from,
                action: "complete",
            }),
        }
    }

    pub fn fail(self) -> Result<Self, LifecycleError> {
        match self {
            Self::Submitting => Ok(Self::Idle),
            from => Err(LifecycleError {
                from,
                action: "fail",
            }),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = SubmissionState::default();
        assert_eq!(state, SubmissionState::Idle);

        let state = state.begin_submit().unwrap();
        assert_eq!(state, SubmissionState::Submitting);

        let state = state.complete().unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let state = SubmissionState::Idle.begin_submit().unwrap().fail().unwrap();
        assert_eq!(state, SubmissionState::Idle);
    }

    #[test]
    fn test_guarded_transitions() {
        assert!(SubmissionState::Submitting.begin_submit().is_err());
        assert!(SubmissionState::Submitted.begin_submit().is_err());
        assert!(SubmissionState::Idle.complete().is_err());
        assert!(SubmissionState::Idle.fail().is_err());
        assert!(SubmissionState::Submitted.fail().is_err());

        let err = SubmissionState::Submitted.begin_submit().unwrap_err();
        assert_eq!(err.from, SubmissionState::Submitted);
        assert_eq!(err.action, "begin_submit");
    }
}
