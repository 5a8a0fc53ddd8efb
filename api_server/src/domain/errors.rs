use thiserror::Error;

use crate::domain::PlatformError;

// Errors surfaced by API use cases.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("missing bearer token")]
    MissingToken,
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("{action} failed: {}", .source.message())]
    Upstream {
        action: &'static str,
        source: PlatformError,
    },
}

impl ApiError {
    // Wraps a platform failure with the name of the attempted action.
    pub fn upstream(action: &'static str) -> impl FnOnce(PlatformError) -> ApiError {
        move |source| ApiError::Upstream { action, source }
    }
}
