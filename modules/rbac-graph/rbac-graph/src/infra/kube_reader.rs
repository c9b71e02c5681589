//! [`ClusterReader`] backed by the Kubernetes API server.

use anyhow::Context;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ServiceAccount;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, RoleBinding};
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use rbac_graph_sdk::{ApiTarget, ClusterReadError, ClusterReader};
use tracing::{debug, info};

use crate::config::KubeClientConfig;

#[derive(Clone)]
pub struct KubeClusterReader {
    client: Client,
}

impl KubeClusterReader {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from `config`, falling back to the default inference
    /// (`KUBECONFIG`, `~/.kube/config`, in-cluster) when nothing is set.
    ///
    /// # Errors
    ///
    /// Fails if the kubeconfig cannot be read or names an unknown context, or
    /// if no configuration can be inferred at all.
    pub async fn connect(config: &KubeClientConfig) -> anyhow::Result<Self> {
        let options = KubeConfigOptions {
            context: config.context.clone(),
            ..KubeConfigOptions::default()
        };

        let client = match (&config.kubeconfig, &config.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path)
                    .with_context(|| format!("failed to read kubeconfig {}", path.display()))?;
                let cfg = Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .context("invalid kubeconfig")?;
                Client::try_from(cfg).context("failed to build kube client")?
            }
            (None, Some(context)) => {
                let cfg = Config::from_kubeconfig(&options)
                    .await
                    .with_context(|| format!("failed to load kubeconfig context {context}"))?;
                Client::try_from(cfg).context("failed to build kube client")?
            }
            (None, None) => Client::try_default()
                .await
                .context("failed to infer kube client configuration")?,
        };

        info!(
            kubeconfig = ?config.kubeconfig,
            context = ?config.context,
            "kube client ready"
        );
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ClusterReader for KubeClusterReader {
    async fn list_cluster_role_bindings(
        &self,
    ) -> Result<Vec<ClusterRoleBinding>, ClusterReadError> {
        let api: Api<ClusterRoleBinding> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error(e, "clusterrolebindings", ""))?;
        Ok(list.items)
    }

    async fn list_role_bindings(&self) -> Result<Vec<RoleBinding>, ClusterReadError> {
        let api: Api<RoleBinding> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error(e, "rolebindings", ""))?;
        Ok(list.items)
    }

    async fn list_dynamic(
        &self,
        target: &ApiTarget,
    ) -> Result<Vec<serde_json::Value>, ClusterReadError> {
        let gvk = GroupVersionKind::gvk(target.group, target.version, target.kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, target.plural);
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &resource);

        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| map_kube_error(e, target.plural, ""))?;
        debug!(plural = target.plural, items = list.items.len(), "listed dynamic resource");

        list.items
            .iter()
            .map(|item| {
                serde_json::to_value(item).map_err(|e| {
                    ClusterReadError::Transport(format!("failed to encode {}: {e}", target.kind))
                })
            })
            .collect()
    }

    async fn get_service_account(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ServiceAccount, ClusterReadError> {
        let api: Api<ServiceAccount> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| map_kube_error(e, "serviceaccount", name))
    }

    async fn get_cluster_role(&self, name: &str) -> Result<ClusterRole, ClusterReadError> {
        let api: Api<ClusterRole> = Api::all(self.client.clone());
        api.get(name)
            .await
            .map_err(|e| map_kube_error(e, "clusterrole", name))
    }
}

fn map_kube_error(err: kube::Error, resource: &str, name: &str) -> ClusterReadError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => ClusterReadError::not_found(resource, name),
        kube::Error::Api(resp) => ClusterReadError::Api {
            status: resp.code,
            message: resp.message,
        },
        other => ClusterReadError::Transport(other.to_string()),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, message: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_owned(),
            message: message.to_owned(),
            reason: String::new(),
            code,
        })
    }

    #[test]
    fn not_found_is_recognised() {
        let err = map_kube_error(
            api_error(404, "clusterroles \"x\" not found"),
            "clusterrole",
            "x",
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "clusterrole 'x' not found");
    }

    #[test]
    fn other_statuses_keep_their_code() {
        let err = map_kube_error(api_error(403, "forbidden"), "rolebindings", "");
        assert_eq!(
            err,
            ClusterReadError::Api {
                status: 403,
                message: "forbidden".to_owned()
            }
        );
    }
}
