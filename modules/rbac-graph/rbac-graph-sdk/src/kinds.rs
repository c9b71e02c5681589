//! Supported binding kinds and their API coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownKindError;

/// API group of the native Kubernetes RBAC resources.
pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";

/// API group of the Rancher management resources.
pub const MANAGEMENT_API_GROUP: &str = "management.cattle.io";

const RBAC_API_VERSION: &str = "rbac.authorization.k8s.io/v1";
const MANAGEMENT_API_VERSION: &str = "management.cattle.io/v3";

/// Coordinates of a resource served through the dynamic API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTarget {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    pub plural: &'static str,
}

/// One of the binding kinds this module understands.
///
/// The declaration order is the order in which kinds are listed and numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    ClusterRoleBinding,
    RoleBinding,
    GlobalRoleBinding,
    ProjectRoleTemplateBinding,
    ClusterRoleTemplateBinding,
}

impl BindingKind {
    /// All kinds in aggregation order.
    pub const ALL: [Self; 5] = [
        Self::ClusterRoleBinding,
        Self::RoleBinding,
        Self::GlobalRoleBinding,
        Self::ProjectRoleTemplateBinding,
        Self::ClusterRoleTemplateBinding,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClusterRoleBinding => "ClusterRoleBinding",
            Self::RoleBinding => "RoleBinding",
            Self::GlobalRoleBinding => "GlobalRoleBinding",
            Self::ProjectRoleTemplateBinding => "ProjectRoleTemplateBinding",
            Self::ClusterRoleTemplateBinding => "ClusterRoleTemplateBinding",
        }
    }

    #[must_use]
    pub const fn api_version(self) -> &'static str {
        if self.is_native() {
            RBAC_API_VERSION
        } else {
            MANAGEMENT_API_VERSION
        }
    }

    /// Native kinds are served by the typed RBAC API; the rest are Rancher CRDs.
    #[must_use]
    pub const fn is_native(self) -> bool {
        matches!(self, Self::ClusterRoleBinding | Self::RoleBinding)
    }

    /// Dynamic API coordinates, `None` for the natively typed kinds.
    #[must_use]
    pub const fn dynamic_target(self) -> Option<ApiTarget> {
        let plural = match self {
            Self::ClusterRoleBinding | Self::RoleBinding => return None,
            Self::GlobalRoleBinding => "globalrolebindings",
            Self::ProjectRoleTemplateBinding => "projectroletemplatebindings",
            Self::ClusterRoleTemplateBinding => "clusterroletemplatebindings",
        };
        Some(ApiTarget {
            group: MANAGEMENT_API_GROUP,
            version: "v3",
            kind: self.as_str(),
            plural,
        })
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BindingKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKindError(s.to_owned()))
    }
}
