//! Fetches every binding-like object from the cluster.

use k8s_openapi::api::rbac::v1::{ClusterRoleBinding, RoleBinding};
use rbac_graph_sdk::{BindingKind, ClusterReadError, ClusterReader};
use tracing::{debug, error};

use super::error::DomainError;

/// Raw list results, one field per [`BindingKind`].
///
/// Native kinds arrive typed; the Rancher kinds arrive as unstructured
/// objects and are converted item by item during normalization.
#[derive(Debug, Default)]
pub struct AggregateBindings {
    pub cluster_role_bindings: Vec<ClusterRoleBinding>,
    pub role_bindings: Vec<RoleBinding>,
    pub global_role_bindings: Vec<serde_json::Value>,
    pub project_role_template_bindings: Vec<serde_json::Value>,
    pub cluster_role_template_bindings: Vec<serde_json::Value>,
}

/// List all five kinds in [`BindingKind::ALL`] order.
///
/// # Errors
///
/// The first failing list call aborts the aggregate with
/// [`DomainError::ClusterRead`]; no partial result is returned.
pub async fn aggregate(reader: &dyn ClusterReader) -> Result<AggregateBindings, DomainError> {
    let cluster_role_bindings = reader
        .list_cluster_role_bindings()
        .await
        .map_err(|e| list_failed(BindingKind::ClusterRoleBinding, e))?;
    let role_bindings = reader
        .list_role_bindings()
        .await
        .map_err(|e| list_failed(BindingKind::RoleBinding, e))?;
    let global_role_bindings = list_dynamic(reader, BindingKind::GlobalRoleBinding).await?;
    let project_role_template_bindings =
        list_dynamic(reader, BindingKind::ProjectRoleTemplateBinding).await?;
    let cluster_role_template_bindings =
        list_dynamic(reader, BindingKind::ClusterRoleTemplateBinding).await?;

    debug!(
        cluster_role_bindings = cluster_role_bindings.len(),
        role_bindings = role_bindings.len(),
        global_role_bindings = global_role_bindings.len(),
        project_role_template_bindings = project_role_template_bindings.len(),
        cluster_role_template_bindings = cluster_role_template_bindings.len(),
        "listed bindings"
    );

    Ok(AggregateBindings {
        cluster_role_bindings,
        role_bindings,
        global_role_bindings,
        project_role_template_bindings,
        cluster_role_template_bindings,
    })
}

async fn list_dynamic(
    reader: &dyn ClusterReader,
    kind: BindingKind,
) -> Result<Vec<serde_json::Value>, DomainError> {
    let Some(target) = kind.dynamic_target() else {
        return Ok(Vec::new());
    };
    reader
        .list_dynamic(&target)
        .await
        .map_err(|e| list_failed(kind, e))
}

fn list_failed(kind: BindingKind, source: ClusterReadError) -> DomainError {
    error!(%kind, error = %source, "failed to list bindings");
    DomainError::cluster_read(kind, source)
}
