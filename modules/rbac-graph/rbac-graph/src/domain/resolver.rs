//! Turns subjects and role references into graph nodes.
//!
//! Only `ServiceAccount` subjects and `ClusterRole` references are checked
//! against the cluster; everything else is synthesized from the reference
//! itself. A miss yields `None` and is logged, never surfaced as an error.

use rbac_graph_sdk::models::{role_kinds, subject_kinds};
use rbac_graph_sdk::{ClusterReader, Node, RoleReference, Subject};
use tracing::debug;

pub struct ReferenceResolver<'a> {
    reader: &'a dyn ClusterReader,
}

impl<'a> ReferenceResolver<'a> {
    #[must_use]
    pub fn new(reader: &'a dyn ClusterReader) -> Self {
        Self { reader }
    }

    pub async fn resolve_subject(&self, subject: &Subject) -> Option<Node> {
        if subject.kind == subject_kinds::SERVICE_ACCOUNT {
            let Some(namespace) = subject.namespace.as_deref().filter(|ns| !ns.is_empty()) else {
                debug!(name = %subject.name, "service account subject has no namespace");
                return None;
            };
            if let Err(e) = self
                .reader
                .get_service_account(namespace, &subject.name)
                .await
            {
                debug!(namespace, name = %subject.name, error = %e, "service account not resolved");
                return None;
            }
        }
        Some(Node::new(
            subject.kind.as_str(),
            subject.api_group.as_str(),
            &subject.name,
        ))
    }

    pub async fn resolve_role_ref(&self, role_ref: &RoleReference) -> Option<Node> {
        match role_ref.kind.as_str() {
            role_kinds::CLUSTER_ROLE => {
                if let Err(e) = self.reader.get_cluster_role(&role_ref.name).await {
                    debug!(name = %role_ref.name, error = %e, "cluster role not resolved");
                    return None;
                }
            }
            role_kinds::ROLE
            | role_kinds::GLOBAL_ROLE
            | role_kinds::ROLE_TEMPLATE
            | role_kinds::PROJECT
            | role_kinds::CLUSTER => {}
            other => {
                debug!(kind = other, name = %role_ref.name, "unsupported role reference kind");
                return None;
            }
        }
        Some(Node::new(
            role_ref.kind.as_str(),
            role_ref.api_group.as_str(),
            &role_ref.name,
        ))
    }
}
