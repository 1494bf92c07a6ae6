use axum::Json;
use log::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Fixed body returned by the brief placeholder route.
#[derive(Debug, Serialize, ToSchema)]
pub struct BriefView {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "brief view placeholder")]
    pub msg: String,
}

impl Default for BriefView {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            msg: "brief view placeholder".to_string(),
        }
    }
}

/// GET the brief view placeholder. Query parameters and bodies are ignored.
#[utoipa::path(
    get,
    path = "/api/brief/view",
    responses(
        (status = 200, description = "Placeholder brief view", body = BriefView),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("agent_token" = [])
    )
)]
pub async fn view() -> Json<BriefView> {
    debug!("GET brief view placeholder");

    Json(BriefView::default())
}
