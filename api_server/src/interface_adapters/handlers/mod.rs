pub mod auth;
pub mod health;
pub mod users;

use axum::{
    Json,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use tracing::{error, warn};

use crate::domain::{ApiError, PlatformError};
use crate::interface_adapters::protocol::ErrorResponse;

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

// Token from `Authorization: Bearer <token>`, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

// Login treats any upstream 4xx as rejected credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorContext {
    Login,
    General,
}

// Maps use case errors to HTTP responses by endpoint context.
pub fn map_api_error(err: ApiError, context: ErrorContext) -> HandlerError {
    let status = match &err {
        ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        ApiError::MissingToken => StatusCode::UNAUTHORIZED,
        ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        ApiError::Upstream { source, .. } => upstream_status(source, context),
    };

    if status.is_server_error() {
        error!(error = %err, status = status.as_u16(), "platform call failed");
    } else {
        warn!(error = %err, status = status.as_u16(), "request rejected");
    }

    error_response(status, &err.to_string())
}

fn upstream_status(source: &PlatformError, context: ErrorContext) -> StatusCode {
    match source {
        PlatformError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        PlatformError::NotFound { .. } => StatusCode::NOT_FOUND,
        PlatformError::Transport(_) | PlatformError::Decode(_) => StatusCode::BAD_GATEWAY,
        PlatformError::Upstream { status, .. } => match (context, *status) {
            (ErrorContext::Login, 400..=499) => StatusCode::UNAUTHORIZED,
            (_, 401 | 403) => StatusCode::UNAUTHORIZED,
            (_, 404) => StatusCode::NOT_FOUND,
            (_, 400..=499) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}
