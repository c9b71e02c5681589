//! Typed schemas for the binding objects.
//!
//! Native bindings listed from the cluster use the `k8s-openapi` types
//! directly. Candidates submitted for what-if evaluation use [`RbacBinding`],
//! which tolerates the fields users routinely omit (`roleRef.apiGroup`,
//! `subjects[].apiGroup`). The Rancher `management.cattle.io/v3` kinds have
//! no published Rust types; they are modelled here with the fields this
//! module reads, and everything else is kept in `extra` so that rendering
//! does not lose data.

use std::collections::BTreeMap;

use k8s_openapi::api::rbac::v1 as rbac;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::kinds::RBAC_API_GROUP;
use crate::models::{RoleReference, Subject, null_as_default, role_kinds};

/// Common view over every binding schema.
pub trait BindingObject: Serialize + DeserializeOwned {
    /// `metadata.name`, empty when unset.
    fn object_name(&self) -> &str;

    /// Subjects granted access by this binding.
    fn subjects(&self) -> Vec<Subject>;

    /// Role and scope references, scope first for dual-role kinds.
    fn role_refs(&self) -> Vec<RoleReference>;

    /// Drop server-side field-manager bookkeeping before rendering.
    fn clear_managed_fields(&mut self);
}

impl BindingObject for rbac::ClusterRoleBinding {
    fn object_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn subjects(&self) -> Vec<Subject> {
        self.subjects
            .iter()
            .flatten()
            .map(Subject::from)
            .collect()
    }

    fn role_refs(&self) -> Vec<RoleReference> {
        vec![native_role_ref(&self.role_ref)]
    }

    fn clear_managed_fields(&mut self) {
        self.metadata.managed_fields = None;
    }
}

impl BindingObject for rbac::RoleBinding {
    fn object_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn subjects(&self) -> Vec<Subject> {
        self.subjects
            .iter()
            .flatten()
            .map(Subject::from)
            .collect()
    }

    fn role_refs(&self) -> Vec<RoleReference> {
        vec![native_role_ref(&self.role_ref)]
    }

    fn clear_managed_fields(&mut self) {
        self.metadata.managed_fields = None;
    }
}

fn native_role_ref(role_ref: &rbac::RoleRef) -> RoleReference {
    RoleReference::new(RBAC_API_GROUP, role_ref.kind.as_str(), role_ref.name.as_str())
}

/// A candidate `RoleBinding` or `ClusterRoleBinding`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RbacBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub role_ref: RoleReference,
}

impl BindingObject for RbacBinding {
    fn object_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn subjects(&self) -> Vec<Subject> {
        self.subjects.clone()
    }

    fn role_refs(&self) -> Vec<RoleReference> {
        vec![self.role_ref.clone()]
    }

    fn clear_managed_fields(&mut self) {
        self.metadata.managed_fields = None;
    }
}

/// `management.cattle.io/v3` `GlobalRoleBinding`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRoleBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub global_role_name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub user_name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub group_principal_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BindingObject for GlobalRoleBinding {
    fn object_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn subjects(&self) -> Vec<Subject> {
        platform_subjects(&self.user_name, &self.group_principal_name)
    }

    fn role_refs(&self) -> Vec<RoleReference> {
        vec![RoleReference::platform(
            role_kinds::GLOBAL_ROLE,
            self.global_role_name.as_str(),
        )]
    }

    fn clear_managed_fields(&mut self) {
        self.metadata.managed_fields = None;
    }
}

/// `management.cattle.io/v3` `ProjectRoleTemplateBinding`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRoleTemplateBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// `<cluster>:<project>` identifier of the scope.
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role_template_name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub user_name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub group_principal_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BindingObject for ProjectRoleTemplateBinding {
    fn object_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn subjects(&self) -> Vec<Subject> {
        platform_subjects(&self.user_name, &self.group_principal_name)
    }

    fn role_refs(&self) -> Vec<RoleReference> {
        vec![
            RoleReference::platform(role_kinds::PROJECT, self.project_name.as_str()),
            RoleReference::platform(role_kinds::ROLE_TEMPLATE, self.role_template_name.as_str()),
        ]
    }

    fn clear_managed_fields(&mut self) {
        self.metadata.managed_fields = None;
    }
}

/// `management.cattle.io/v3` `ClusterRoleTemplateBinding`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRoleTemplateBinding {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cluster_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role_template_name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub user_name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub group_principal_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BindingObject for ClusterRoleTemplateBinding {
    fn object_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn subjects(&self) -> Vec<Subject> {
        platform_subjects(&self.user_name, &self.group_principal_name)
    }

    fn role_refs(&self) -> Vec<RoleReference> {
        vec![
            RoleReference::platform(role_kinds::CLUSTER, self.cluster_name.as_str()),
            RoleReference::platform(role_kinds::ROLE_TEMPLATE, self.role_template_name.as_str()),
        ]
    }

    fn clear_managed_fields(&mut self) {
        self.metadata.managed_fields = None;
    }
}

// `userName` wins over `groupPrincipalName`; a binding with neither has no subject.
fn platform_subjects(user_name: &str, group_principal_name: &str) -> Vec<Subject> {
    if !user_name.is_empty() {
        vec![Subject::platform_user(user_name)]
    } else if !group_principal_name.is_empty() {
        vec![Subject::platform_group(group_principal_name)]
    } else {
        Vec::new()
    }
}
