use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::Extension;
use rbac_graph_sdk::{BindingRecord, Graph};
use tracing::{field::Empty, info};

use crate::api::rest::dto::WhatIfRequest;
use crate::api::rest::error::Problem;
use crate::domain::error::DomainError;
use crate::domain::service::RbacGraphService;

/// List every binding in the cluster
#[tracing::instrument(skip(svc), fields(records = Empty))]
pub async fn list_bindings(
    Extension(svc): Extension<Arc<RbacGraphService>>,
) -> Result<Json<Vec<BindingRecord>>, Problem> {
    let records = svc.list_bindings().await?;
    tracing::Span::current().record("records", records.len());
    Ok(Json(records))
}

/// Evaluate a candidate binding without applying it
///
/// The body is decoded here rather than through the `Json` extractor so that
/// a malformed envelope gets the same problem body as every other input error.
#[tracing::instrument(skip(svc, body), fields(body_len = body.len()))]
pub async fn what_if(
    Extension(svc): Extension<Arc<RbacGraphService>>,
    body: Bytes,
) -> Result<Json<Graph>, Problem> {
    let request: WhatIfRequest = serde_json::from_slice(&body)
        .map_err(|e| DomainError::invalid_request(format!("invalid request body: {e}")))?;

    info!(yaml_len = request.yaml.len(), "Evaluating what-if candidate");

    let graph = svc.what_if(&request.yaml).await?;
    Ok(Json(graph))
}
