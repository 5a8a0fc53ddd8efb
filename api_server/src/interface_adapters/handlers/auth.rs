use axum::{Json, extract::State, http::HeaderMap};

use crate::interface_adapters::handlers::{ErrorContext, HandlerError, bearer_token, map_api_error};
use crate::interface_adapters::protocol::{
    LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, StatusResponse,
    UpdatePasswordRequest, UserResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::login::LoginUseCase;
use crate::use_cases::logout::LogoutUseCase;
use crate::use_cases::register::RegisterUseCase;
use crate::use_cases::reset_password::ResetPasswordUseCase;
use crate::use_cases::update_password::UpdatePasswordUseCase;

#[tracing::instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HandlerError> {
    let use_case = LoginUseCase {
        platform: state.platform.as_ref(),
    };

    let session = use_case
        .execute(&payload.email, &payload.password)
        .await
        .map_err(|err| map_api_error(err, ErrorContext::Login))?;

    tracing::info!(user_id = %session.user.id, "signed in");
    Ok(Json(session.into()))
}

#[tracing::instrument(name = "register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, HandlerError> {
    let use_case = RegisterUseCase {
        platform: state.platform.as_ref(),
    };

    let user = use_case
        .execute(&payload.email, &payload.password, &payload.username)
        .await
        .map_err(|err| map_api_error(err, ErrorContext::General))?;

    tracing::info!(user_id = %user.id, "account created");
    Ok(Json(UserResponse { user }))
}

#[tracing::instrument(name = "reset_password", skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<StatusResponse>, HandlerError> {
    let use_case = ResetPasswordUseCase {
        platform: state.platform.as_ref(),
        frontend_url: &state.frontend_url,
    };

    use_case
        .execute(&payload.email)
        .await
        .map_err(|err| map_api_error(err, ErrorContext::General))?;

    Ok(Json(StatusResponse::ok("Password reset email sent")))
}

#[tracing::instrument(name = "update_password", skip_all)]
pub async fn update_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<StatusResponse>, HandlerError> {
    let use_case = UpdatePasswordUseCase {
        platform: state.platform.as_ref(),
    };

    use_case
        .execute(bearer_token(&headers), &payload.password)
        .await
        .map_err(|err| map_api_error(err, ErrorContext::General))?;

    Ok(Json(StatusResponse::ok("Password updated successfully")))
}

#[tracing::instrument(name = "logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, HandlerError> {
    let use_case = LogoutUseCase {
        platform: state.platform.as_ref(),
    };

    use_case
        .execute(bearer_token(&headers))
        .await
        .map_err(|err| map_api_error(err, ErrorContext::General))?;

    Ok(Json(StatusResponse::ok("Signed out successfully")))
}
