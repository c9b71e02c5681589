//! Cluster access API consumed by the RBAC graph module.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, RoleBinding};

use crate::error::ClusterReadError;
use crate::kinds::ApiTarget;

/// Read-only access to cluster state.
///
/// Implementations must be safe for concurrent use: one instance is shared
/// by every in-flight request.
///
/// ```ignore
/// let reader: Arc<dyn ClusterReader> = Arc::new(KubeClusterReader::new(client));
///
/// let bindings = reader.list_role_bindings().await?;
/// ```
#[async_trait]
pub trait ClusterReader: Send + Sync {
    /// List every `ClusterRoleBinding`.
    ///
    /// # Errors
    ///
    /// - `Api` if the API server rejects the call (e.g. forbidden)
    /// - `Transport` if the API server is unreachable
    async fn list_cluster_role_bindings(&self)
    -> Result<Vec<ClusterRoleBinding>, ClusterReadError>;

    /// List every `RoleBinding` across all namespaces.
    ///
    /// # Errors
    ///
    /// Same as [`ClusterReader::list_cluster_role_bindings`].
    async fn list_role_bindings(&self) -> Result<Vec<RoleBinding>, ClusterReadError>;

    /// List a resource through the dynamic API, returning unstructured objects.
    ///
    /// # Errors
    ///
    /// Same as [`ClusterReader::list_cluster_role_bindings`]; a resource type
    /// the server does not serve is reported as `NotFound` or `Api`.
    async fn list_dynamic(
        &self,
        target: &ApiTarget,
    ) -> Result<Vec<serde_json::Value>, ClusterReadError>;

    /// Fetch one `ServiceAccount`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if it does not exist
    /// - `Api` / `Transport` for other failures
    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceAccount, ClusterReadError>;

    /// Fetch one `ClusterRole`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if it does not exist
    /// - `Api` / `Transport` for other failures
    async fn get_cluster_role(&self, name: &str) -> Result<ClusterRole, ClusterReadError>;
}
