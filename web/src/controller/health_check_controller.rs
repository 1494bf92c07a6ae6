use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET liveness check
#[utoipa::path(
    get,
    path = "/api/healthz",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String, content_type = "text/plain"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("agent_token" = [])
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
