//! Domain models for the RBAC graph module.
//!
//! Field names serialize in camelCase to match the Kubernetes wire shapes the
//! UI already consumes.

use serde::{Deserialize, Deserializer, Serialize};

use crate::kinds::{BindingKind, MANAGEMENT_API_GROUP};

/// Well-known subject kinds.
pub mod subject_kinds {
    pub const USER: &str = "User";
    pub const GROUP: &str = "Group";
    pub const SERVICE_ACCOUNT: &str = "ServiceAccount";
}

/// Well-known role reference kinds.
pub mod role_kinds {
    pub const ROLE: &str = "Role";
    pub const CLUSTER_ROLE: &str = "ClusterRole";
    pub const ROLE_TEMPLATE: &str = "RoleTemplate";
    pub const GLOBAL_ROLE: &str = "GlobalRole";
    pub const PROJECT: &str = "Project";
    pub const CLUSTER: &str = "Cluster";
}

/// Reads an explicit `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A principal bound by a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub api_group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Subject {
    /// Rancher user subject synthesized from a platform binding's `userName`.
    pub fn platform_user(name: impl Into<String>) -> Self {
        Self {
            api_group: MANAGEMENT_API_GROUP.to_owned(),
            kind: subject_kinds::USER.to_owned(),
            name: name.into(),
            namespace: None,
        }
    }

    /// Rancher group subject synthesized from `groupPrincipalName`.
    pub fn platform_group(name: impl Into<String>) -> Self {
        Self {
            api_group: MANAGEMENT_API_GROUP.to_owned(),
            kind: subject_kinds::GROUP.to_owned(),
            name: name.into(),
            namespace: None,
        }
    }
}

impl From<&k8s_openapi::api::rbac::v1::Subject> for Subject {
    fn from(subject: &k8s_openapi::api::rbac::v1::Subject) -> Self {
        Self {
            api_group: subject.api_group.clone().unwrap_or_default(),
            kind: subject.kind.clone(),
            name: subject.name.clone(),
            namespace: subject.namespace.clone(),
        }
    }
}

/// The permission set, or for platform bindings the scope, granted by a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleReference {
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl RoleReference {
    pub fn new(
        api_group: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            api_group: api_group.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Rancher management reference (`GlobalRole`, `RoleTemplate`, `Project`, `Cluster`).
    pub fn platform(kind: &str, name: impl Into<String>) -> Self {
        Self::new(MANAGEMENT_API_GROUP, kind, name)
    }
}

/// Kind-erased projection of one binding relationship.
///
/// Dual-role kinds produce two records with the same `id` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingRecord {
    pub name: String,
    pub id: usize,
    pub kind: BindingKind,
    pub subjects: Vec<Subject>,
    pub role_ref: RoleReference,
    /// YAML rendering of the source object, or the rendering error text.
    pub raw: String,
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub kind: String,
    pub api_group: String,
    pub label: String,
}

impl Node {
    /// Node whose id and label are `kind-name`.
    pub fn new(kind: impl Into<String>, api_group: impl Into<String>, name: &str) -> Self {
        let kind = kind.into();
        let id = node_id(&kind, name);
        Self {
            label: id.clone(),
            id,
            kind,
            api_group: api_group.into(),
        }
    }
}

/// Deterministic node identifier. Ids only collide across kinds sharing a name.
#[must_use]
pub fn node_id(kind: &str, name: &str) -> String {
    format!("{kind}-{name}")
}

/// A directed edge from a binding node to a subject or role node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

/// Node/link graph produced by a what-if evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    /// Add `node` and a link to it from `source`.
    ///
    /// No de-duplication by id is performed.
    pub fn attach(&mut self, source: &str, node: Node) {
        self.links.push(Link {
            source: source.to_owned(),
            target: node.id.clone(),
        });
        self.nodes.push(node);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_wire_field_names() {
        let record = BindingRecord {
            name: "admins".to_owned(),
            id: 3,
            kind: BindingKind::ClusterRoleBinding,
            subjects: vec![Subject {
                api_group: String::new(),
                kind: "ServiceAccount".to_owned(),
                name: "builder".to_owned(),
                namespace: Some("ci".to_owned()),
            }],
            role_ref: RoleReference::new("rbac.authorization.k8s.io", "ClusterRole", "admin"),
            raw: "kind: ClusterRoleBinding\n".to_owned(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "admins",
                "id": 3,
                "kind": "ClusterRoleBinding",
                "subjects": [{"kind": "ServiceAccount", "name": "builder", "namespace": "ci"}],
                "roleRef": {"apiGroup": "rbac.authorization.k8s.io", "kind": "ClusterRole", "name": "admin"},
                "raw": "kind: ClusterRoleBinding\n"
            })
        );
    }

    #[test]
    fn node_id_and_label_are_kind_dash_name() {
        let node = Node::new("Role", "rbac.authorization.k8s.io", "viewer");
        assert_eq!(node.id, "Role-viewer");
        assert_eq!(node.label, "Role-viewer");
        assert_eq!(
            serde_json::to_value(&node).unwrap()["apiGroup"],
            "rbac.authorization.k8s.io"
        );
    }

    #[test]
    fn attach_keeps_duplicates() {
        let mut graph = Graph::default();
        graph.attach("RoleBinding-a", Node::new("User", "", "alice"));
        graph.attach("RoleBinding-a", Node::new("User", "", "alice"));
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links[1].target, "User-alice");
    }

    #[test]
    fn null_strings_read_as_empty() {
        let role_ref: RoleReference = serde_yaml::from_str(
            "apiGroup: ~\nkind: ClusterRole\nname: view\n",
        )
        .unwrap();
        assert_eq!(role_ref, RoleReference::new("", "ClusterRole", "view"));

        let subject: Subject =
            serde_json::from_str(r#"{"apiGroup":null,"kind":"User","name":"alice"}"#).unwrap();
        assert_eq!(subject.api_group, "");
        assert_eq!(subject.name, "alice");
    }

    #[test]
    fn subject_tolerates_missing_fields() {
        let subject: Subject = serde_json::from_str(r#"{"kind":"User","name":"alice"}"#).unwrap();
        assert_eq!(subject.api_group, "");
        assert_eq!(subject.namespace, None);
    }
}
