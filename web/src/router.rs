use crate::{
    controller::{brief_controller, health_check_controller},
    middleware::{cors, security_headers, token_gate},
    sse, AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower::ServiceBuilder;

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

/// Every route this process serves lives under this prefix.
pub const API_PREFIX: &str = "/api";

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Amara Core API"
        ),
        paths(
            brief_controller::view,
            health_check_controller::health_check,
            sse::handler::stream_test,
        ),
        components(
            schemas(
                brief_controller::BriefView,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "amara_core", description = "Amara Core API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines the shared-secret header requirement enforced by the token gate.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "agent_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "X-Agent-Token",
                    "Shared secret matching AGENT_TOKEN; only enforced when AGENT_TOKEN is set",
                ))),
            )
        }
    }
}

/// Assembles the full application: the `/api` route table and API docs behind
/// security headers, CORS and the token gate (outermost first).
pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors::cors_layer(&app_state.config);

    let router = Router::new()
        .nest(API_PREFIX, api_routes())
        .merge(
            RapiDoc::with_openapi("/api/api-docs/openapi.json", ApiDoc::openapi())
                .path("/api/rapidoc"),
        )
        .layer(
            ServiceBuilder::new().layer(cors).layer(from_fn_with_state(
                app_state,
                token_gate::require_agent_token,
            )),
        );

    security_headers::apply(router)
}

// `/api/llm/*` is served by the reverse proxy in front of this process.
fn api_routes() -> Router {
    Router::new()
        .merge(brief_routes())
        .merge(health_routes())
        .merge(stream_routes())
}

fn brief_routes() -> Router {
    Router::new().route("/brief/view", get(brief_controller::view))
}

fn health_routes() -> Router {
    Router::new().route("/healthz", get(health_check_controller::health_check))
}

fn stream_routes() -> Router {
    Router::new().route("/stream/test", get(sse::handler::stream_test))
}
