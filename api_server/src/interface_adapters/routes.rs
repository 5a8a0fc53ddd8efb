use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::interface_adapters::handlers::auth::{
    login, logout, register, reset_password, update_password,
};
use crate::interface_adapters::handlers::health::health;
use crate::interface_adapters::handlers::users::{
    delete_user, get_profile, update_profile, upload_avatar,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::avatar::MAX_AVATAR_BYTES;

// Prefix shared by every API route; `/health` stays at the root.
pub const API_PREFIX: &str = "/api";

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/update-password", post(update_password))
        .route("/auth/logout", post(logout))
        .route("/users/register", post(register))
        .route("/users/{id}", get(get_profile).put(update_profile).delete(delete_user))
        .route("/users/{id}/profile", get(get_profile).put(update_profile))
        .route(
            "/users/{id}/avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES)),
        )
}
