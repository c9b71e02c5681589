//! Entry points of the RBAC graph module.

use std::sync::Arc;

use rbac_graph_sdk::{BindingRecord, ClusterReader, Graph};
use tracing::info;

use super::aggregator::aggregate;
use super::error::DomainError;
use super::normalizer::normalize;
use super::resolver::ReferenceResolver;
use super::what_if::{build_graph, parse_candidate};

/// Lists bindings and evaluates what-if candidates against one cluster.
///
/// Holds no state besides the shared reader; every call starts from a fresh
/// read of the cluster.
#[derive(Clone)]
pub struct RbacGraphService {
    reader: Arc<dyn ClusterReader>,
}

impl RbacGraphService {
    #[must_use]
    pub fn new(reader: Arc<dyn ClusterReader>) -> Self {
        Self { reader }
    }

    /// Every binding in the cluster as an ordered record table.
    ///
    /// # Errors
    ///
    /// [`DomainError::ClusterRead`] if any list call fails.
    #[tracing::instrument(skip_all)]
    pub async fn list_bindings(&self) -> Result<Vec<BindingRecord>, DomainError> {
        let bindings = aggregate(self.reader.as_ref()).await?;
        let records = normalize(bindings);
        info!(records = records.len(), "listed binding records");
        Ok(records)
    }

    /// Graph of the access the candidate in `yaml` would grant.
    ///
    /// # Errors
    ///
    /// A client-error [`DomainError`] when `yaml` is not a supported binding.
    #[tracing::instrument(skip_all)]
    pub async fn what_if(&self, yaml: &str) -> Result<Graph, DomainError> {
        let candidate = parse_candidate(yaml)?;
        let resolver = ReferenceResolver::new(self.reader.as_ref());
        let graph = build_graph(&resolver, &candidate).await;
        info!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            "evaluated what-if candidate"
        );
        Ok(graph)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::{
        InMemoryClusterReader, cluster_role_binding, global_role_binding, role_binding,
    };
    use rbac_graph_sdk::BindingKind;

    fn service(reader: InMemoryClusterReader) -> RbacGraphService {
        RbacGraphService::new(Arc::new(reader))
    }

    #[tokio::test]
    async fn listing_is_repeatable() {
        let svc = service(
            InMemoryClusterReader::new()
                .with_cluster_role_binding(cluster_role_binding(
                    "ops",
                    "ClusterRole",
                    "admin",
                    &[("User", "alice", None)],
                ))
                .with_role_binding(role_binding("dev", "viewers", "Role", "viewer", &[]))
                .with_dynamic(BindingKind::GlobalRoleBinding, global_role_binding("g", "bob", "admin")),
        );

        let first = svc.list_bindings().await.unwrap();
        let second = svc.list_bindings().await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn list_failure_propagates() {
        let svc = service(InMemoryClusterReader::new().failing_list(BindingKind::ClusterRoleBinding));
        let err = svc.list_bindings().await.unwrap_err();
        assert!(matches!(err, DomainError::ClusterRead { .. }));
    }

    #[tokio::test]
    async fn unsupported_candidate_produces_no_graph() {
        let svc = service(InMemoryClusterReader::new());
        let err = svc.what_if("kind: ConfigMap\n").await.unwrap_err();
        assert!(err.is_client_error());
    }
}
