use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use http::HeaderValue;
use http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::rest::handlers;
use crate::domain::service::RbacGraphService;

pub fn register_routes(router: Router, service: Arc<RbacGraphService>) -> Router {
    // GET /api/data - Every binding as a flat record table
    // POST /api/what-if - Graph a candidate binding would add
    let api = Router::new()
        .route("/api/data", get(handlers::list_bindings))
        .route("/api/what-if", post(handlers::what_if))
        .layer(Extension(service));

    router.merge(with_no_cache(api))
}

/// Cluster state changes underneath the API; responses must never be cached.
fn with_no_cache(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            EXPIRES,
            HeaderValue::from_static("0"),
        ))
}
