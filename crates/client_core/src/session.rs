use std::fmt;

use shared::{domain::ClassificationResult, error::ClassifyError};

use crate::{
    presenter::{self, PresentationDescriptor},
    validator::SelectedFile,
};

/// Where the workflow is. Replaced as a whole on every transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Empty,
    Ready(SelectedFile),
    Submitting(SelectedFile),
    Succeeded(SelectedFile, ClassificationResult),
    Failed(SelectedFile, ClassifyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Ready,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Empty => "empty",
            Phase::Ready => "ready",
            Phase::Submitting => "submitting",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Empty => Phase::Empty,
            SessionState::Ready(_) => Phase::Ready,
            SessionState::Submitting(_) => Phase::Submitting,
            SessionState::Succeeded(..) => Phase::Succeeded,
            SessionState::Failed(..) => Phase::Failed,
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        match self {
            SessionState::Empty => None,
            SessionState::Ready(file)
            | SessionState::Submitting(file)
            | SessionState::Succeeded(file, _)
            | SessionState::Failed(file, _) => Some(file),
        }
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            SessionState::Succeeded(_, result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClassifyError> {
        match self {
            SessionState::Failed(_, error) => Some(error),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    pub fn can_submit(&self) -> bool {
        matches!(self, SessionState::Ready(_))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SessionState::Submitting(_))
    }

    /// Computed from the result label each time it is asked for.
    pub fn presentation(&self) -> Option<PresentationDescriptor> {
        self.result().map(|result| presenter::describe(&result.label))
    }
}
