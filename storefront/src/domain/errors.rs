// Failure of a single storage tier. Never fatal; callers degrade to "absent".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage tier unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage io error: {0}")]
    Io(String),
    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
}

// Errors surfaced by calls to the hosted auth/storage/database platform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("platform request timed out")]
    Timeout,
    #[error("platform transport error: {0}")]
    Transport(String),
    #[error("platform upstream error {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("platform response decode error: {0}")]
    Decode(String),
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
}

impl PlatformError {
    // Only idempotent reads consult this; mutations are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            PlatformError::Timeout | PlatformError::Transport(_) => true,
            PlatformError::Upstream { status, .. } => *status >= 500,
            PlatformError::Decode(_) | PlatformError::NotFound { .. } => false,
        }
    }

    // Human-readable message without the error category prefix.
    pub fn message(&self) -> String {
        match self {
            PlatformError::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
