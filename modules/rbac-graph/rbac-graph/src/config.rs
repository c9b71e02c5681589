//! Configuration for the RBAC graph module.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How to reach the Kubernetes API server.
///
/// With both fields unset the client is inferred: `KUBECONFIG`, then
/// `~/.kube/config`, then the in-cluster service account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KubeClientConfig {
    /// Explicit kubeconfig file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}
