use axum::http::{HeaderValue, Method};
use log::*;
use service::config::{Config, ANY_ORIGIN};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Builds the CORS policy from the startup allow-list. A `*` entry allows any
/// origin; otherwise only the listed origins are echoed back. Credentials are
/// never allowed.
pub(crate) fn cors_layer(config: &Config) -> CorsLayer {
    let origins = config.allowed_origins();
    info!("CORS allowed origins: {origins:?}");

    CorsLayer::new()
        .allow_origin(allow_origin(&origins))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(false)
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|origin| origin == ANY_ORIGIN) {
        return AllowOrigin::any();
    }

    AllowOrigin::list(origins.iter().filter_map(|origin| {
        match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring CORS origin {origin:?}: {e}");
                None
            }
        }
    }))
}
