use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, header::CONTENT_TYPE},
};

use crate::domain::UserProfile;
use crate::interface_adapters::handlers::{ErrorContext, HandlerError, map_api_error};
use crate::interface_adapters::protocol::{AvatarQuery, StatusResponse, UpdateProfileRequest};
use crate::interface_adapters::state::AppState;
use crate::use_cases::avatar::AvatarUseCase;
use crate::use_cases::delete_user::DeleteUserUseCase;
use crate::use_cases::profile::ProfileUseCase;

#[tracing::instrument(name = "get_profile", skip_all, fields(user_id = %user_id))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, HandlerError> {
    let use_case = ProfileUseCase {
        platform: state.platform.as_ref(),
        storage: &state.storage,
    };

    let profile = use_case
        .get(&user_id)
        .await
        .map_err(|err| map_api_error(err, ErrorContext::General))?;

    Ok(Json(profile))
}

#[tracing::instrument(name = "update_profile", skip_all, fields(user_id = %user_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, HandlerError> {
    let use_case = ProfileUseCase {
        platform: state.platform.as_ref(),
        storage: &state.storage,
    };

    let profile = use_case
        .update(&user_id, payload.into())
        .await
        .map_err(|err| map_api_error(err, ErrorContext::General))?;

    Ok(Json(profile))
}

// Raw image body; the file name only contributes its extension.
#[tracing::instrument(name = "upload_avatar", skip_all, fields(user_id = %user_id))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<AvatarQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UserProfile>, HandlerError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let file_name = query.file_name.unwrap_or_else(|| {
        format!("avatar.{}", content_type.trim_start_matches("image/"))
    });

    let use_case = AvatarUseCase {
        platform: state.platform.as_ref(),
        storage: &state.storage,
    };

    let profile = use_case
        .execute(&user_id, &file_name, &content_type, body.to_vec())
        .await
        .map_err(|err| map_api_error(err, ErrorContext::General))?;

    Ok(Json(profile))
}

#[tracing::instrument(name = "delete_user", skip_all, fields(user_id = %user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<StatusResponse>, HandlerError> {
    let use_case = DeleteUserUseCase {
        platform: state.platform.as_ref(),
    };

    use_case
        .execute(&user_id)
        .await
        .map_err(|err| map_api_error(err, ErrorContext::General))?;

    tracing::info!(%user_id, "user deleted");
    Ok(Json(StatusResponse::ok("User deletion requested")))
}
