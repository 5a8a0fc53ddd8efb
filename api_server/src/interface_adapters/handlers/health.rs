use axum::Json;

use crate::interface_adapters::protocol::HealthResponse;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
