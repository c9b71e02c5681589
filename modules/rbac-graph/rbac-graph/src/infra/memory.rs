//! In-memory [`ClusterReader`] for tests and offline demos.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, RoleBinding};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use rbac_graph_sdk::{ApiTarget, BindingKind, ClusterReadError, ClusterReader};

/// Fixed cluster contents assembled with builder methods.
///
/// ```ignore
/// let reader = InMemoryClusterReader::new()
///     .with_cluster_role("view")
///     .with_service_account("ci", "deployer")
///     .failing_list(BindingKind::GlobalRoleBinding);
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryClusterReader {
    cluster_role_bindings: Vec<ClusterRoleBinding>,
    role_bindings: Vec<RoleBinding>,
    dynamic: BTreeMap<&'static str, Vec<serde_json::Value>>,
    service_accounts: BTreeSet<(String, String)>,
    cluster_roles: BTreeSet<String>,
    failing: HashSet<BindingKind>,
}

impl InMemoryClusterReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cluster_role_binding(mut self, binding: ClusterRoleBinding) -> Self {
        self.cluster_role_bindings.push(binding);
        self
    }

    #[must_use]
    pub fn with_role_binding(mut self, binding: RoleBinding) -> Self {
        self.role_bindings.push(binding);
        self
    }

    /// Add an unstructured object listed through the dynamic API for `kind`.
    /// Native kinds are ignored.
    #[must_use]
    pub fn with_dynamic(mut self, kind: BindingKind, object: serde_json::Value) -> Self {
        if let Some(target) = kind.dynamic_target() {
            self.dynamic.entry(target.plural).or_default().push(object);
        }
        self
    }

    #[must_use]
    pub fn with_service_account(mut self, namespace: &str, name: &str) -> Self {
        self.service_accounts
            .insert((namespace.to_owned(), name.to_owned()));
        self
    }

    #[must_use]
    pub fn with_cluster_role(mut self, name: &str) -> Self {
        self.cluster_roles.insert(name.to_owned());
        self
    }

    /// Make listing `kind` fail with a 403.
    #[must_use]
    pub fn failing_list(mut self, kind: BindingKind) -> Self {
        self.failing.insert(kind);
        self
    }

    fn check_list(&self, kind: BindingKind) -> Result<(), ClusterReadError> {
        if self.failing.contains(&kind) {
            return Err(ClusterReadError::Api {
                status: 403,
                message: format!("listing {kind} is forbidden"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterReader for InMemoryClusterReader {
    async fn list_cluster_role_bindings(
        &self,
    ) -> Result<Vec<ClusterRoleBinding>, ClusterReadError> {
        self.check_list(BindingKind::ClusterRoleBinding)?;
        Ok(self.cluster_role_bindings.clone())
    }

    async fn list_role_bindings(&self) -> Result<Vec<RoleBinding>, ClusterReadError> {
        self.check_list(BindingKind::RoleBinding)?;
        Ok(self.role_bindings.clone())
    }

    async fn list_dynamic(
        &self,
        target: &ApiTarget,
    ) -> Result<Vec<serde_json::Value>, ClusterReadError> {
        if let Ok(kind) = target.kind.parse::<BindingKind>() {
            self.check_list(kind)?;
        }
        Ok(self.dynamic.get(target.plural).cloned().unwrap_or_default())
    }

    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceAccount, ClusterReadError> {
        if !self
            .service_accounts
            .contains(&(namespace.to_owned(), name.to_owned()))
        {
            return Err(ClusterReadError::not_found("serviceaccount", name));
        }
        Ok(ServiceAccount {
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                namespace: Some(namespace.to_owned()),
                ..ObjectMeta::default()
            },
            ..ServiceAccount::default()
        })
    }

    async fn get_cluster_role(&self, name: &str) -> Result<ClusterRole, ClusterReadError> {
        if !self.cluster_roles.contains(name) {
            return Err(ClusterReadError::not_found("clusterrole", name));
        }
        Ok(ClusterRole {
            metadata: ObjectMeta {
                name: Some(name.to_owned()),
                ..ObjectMeta::default()
            },
            ..ClusterRole::default()
        })
    }
}
