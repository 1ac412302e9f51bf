use thiserror::Error;

/// Local rejection of a candidate file, raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a valid image file")]
    UnsupportedType { media_type: Option<String> },
    #[error("Image size must be less than 10MB")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    ServiceStatus,
    ServiceReported,
}

/// Every way a classification attempt can end without a result.
///
/// `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Connection error: {reason}. Make sure the backend server is running.")]
    Transport { reason: String },
    #[error("Server error: {status}")]
    ServiceStatus { status: u16 },
    #[error("{message}")]
    ServiceReported { message: String },
}

impl ClassifyError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::ServiceStatus { .. } => ErrorKind::ServiceStatus,
            Self::ServiceReported { .. } => ErrorKind::ServiceReported,
        }
    }
}
