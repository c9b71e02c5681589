use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::middleware::from_fn;
use rbac_graph::RbacGraphService;
use rbac_graph::api::rest::register_routes;
use rbac_graph::infra::KubeClusterReader;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::cors::build_cors_layer;
use crate::request_log::log_requests;

/// Connect to the cluster and serve until `shutdown` resolves.
///
/// # Errors
///
/// Fails if no Kubernetes client can be built, the listener cannot bind, or
/// the server stops with an I/O error.
pub async fn run<F>(config: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let reader = KubeClusterReader::connect(&config.kube)
        .await
        .context("failed to create Kubernetes client")?;
    let service = Arc::new(RbacGraphService::new(Arc::new(reader)));
    let app = build_router(service, &config);

    let addr = format!("{}:{}", config.server.bind_host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        static_dir = ?config.server.static_dir,
        "Starting rbac-wizard on http://localhost:{}",
        config.server.port
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .context("server terminated")?;

    info!("rbac-wizard stopped");
    Ok(())
}

/// Resolve when `signal` fires.
///
/// A signal that cannot be registered is logged and never resolves, so the
/// server keeps running instead of shutting down on startup.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(error = %e, "failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Assemble API routes, the optional UI and the middleware stack.
#[must_use]
pub fn build_router(service: Arc<RbacGraphService>, config: &AppConfig) -> Router {
    let mut router = register_routes(Router::new(), service);
    if let Some(dir) = &config.server.static_dir {
        router = router.merge(static_routes(dir));
    }

    // The last layer added runs first: Trace -> request log -> CORS -> routes.
    // CORS answers preflights itself, so the log must sit outside it.
    router
        .layer(build_cors_layer(&config.cors, config.server.port))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
}

// Unknown paths get index.html with 200 so client-side routes survive a reload.
fn static_routes(dir: &Path) -> Router {
    let index = dir.join("index.html");
    Router::new()
        .route_service("/", ServeFile::new(&index))
        .route_service("/what-if", ServeFile::new(dir.join("what-if.html")))
        .fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
}
