use std::time::Duration;

use http::header::HOST;
use http::request::Parts;
use http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer.
///
/// Besides the configured origins, `https://<Host>` of the incoming request
/// is accepted so the UI works behind a TLS-terminating ingress.
#[must_use]
pub fn build_cors_layer(config: &CorsConfig, port: u16) -> CorsLayer {
    let origins = config.effective_origins(port);

    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, parts: &Parts| {
        let Ok(origin) = origin.to_str() else {
            return false;
        };
        origins.iter().any(|allowed| allowed == origin) || origin_matches_host(origin, parts)
    });

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();
    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn origin_matches_host(origin: &str, parts: &Parts) -> bool {
    let Some(host) = parts.headers.get(HOST).and_then(|h| h.to_str().ok()) else {
        return false;
    };
    origin.strip_prefix("https://") == Some(host)
}
