use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Log one line per completed request, at a level chosen by status class.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_owned(), |ConnectInfo(addr)| addr.to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if response.status().is_server_error() {
        error!(%method, %path, status, %remote_addr, duration_ms, "request completed");
    } else if response.status().is_client_error() {
        warn!(%method, %path, status, %remote_addr, duration_ms, "request completed");
    } else {
        info!(%method, %path, status, %remote_addr, duration_ms, "request completed");
    }
    response
}
