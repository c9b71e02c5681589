//! Fixture builders shared by the unit tests.

use k8s_openapi::api::rbac::v1 as rbac;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

pub use crate::infra::memory::InMemoryClusterReader;

/// `(kind, name, namespace)` triple describing one subject.
pub type SubjectDef<'a> = (&'a str, &'a str, Option<&'a str>);

fn subjects(defs: &[SubjectDef<'_>]) -> Option<Vec<rbac::Subject>> {
    if defs.is_empty() {
        return None;
    }
    Some(
        defs
            .iter()
            .map(|(kind, name, namespace)| rbac::Subject {
                api_group: (*kind != "ServiceAccount").then(|| "rbac.authorization.k8s.io".to_owned()),
                kind: (*kind).to_owned(),
                name: (*name).to_owned(),
                namespace: namespace.map(str::to_owned),
            })
            .collect(),
    )
}

fn role_ref(kind: &str, name: &str) -> rbac::RoleRef {
    rbac::RoleRef {
        api_group: "rbac.authorization.k8s.io".to_owned(),
        kind: kind.to_owned(),
        name: name.to_owned(),
    }
}

pub fn cluster_role_binding(
    name: &str,
    role_kind: &str,
    role_name: &str,
    subject_defs: &[SubjectDef<'_>],
) -> rbac::ClusterRoleBinding {
    rbac::ClusterRoleBinding {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            ..ObjectMeta::default()
        },
        role_ref: role_ref(role_kind, role_name),
        subjects: subjects(subject_defs),
    }
}

pub fn role_binding(
    namespace: &str,
    name: &str,
    role_kind: &str,
    role_name: &str,
    subject_defs: &[SubjectDef<'_>],
) -> rbac::RoleBinding {
    rbac::RoleBinding {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            namespace: Some(namespace.to_owned()),
            ..ObjectMeta::default()
        },
        role_ref: role_ref(role_kind, role_name),
        subjects: subjects(subject_defs),
    }
}

pub fn global_role_binding(name: &str, user: &str, global_role: &str) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "management.cattle.io/v3",
        "kind": "GlobalRoleBinding",
        "metadata": {"name": name},
        "userName": user,
        "globalRoleName": global_role
    })
}

pub fn project_role_template_binding(
    name: &str,
    user: &str,
    project: &str,
    role_template: &str,
) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "management.cattle.io/v3",
        "kind": "ProjectRoleTemplateBinding",
        "metadata": {"name": name, "namespace": "p-1"},
        "userName": user,
        "projectName": project,
        "roleTemplateName": role_template
    })
}

pub fn cluster_role_template_binding(
    name: &str,
    user: &str,
    cluster: &str,
    role_template: &str,
) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "management.cattle.io/v3",
        "kind": "ClusterRoleTemplateBinding",
        "metadata": {"name": name, "namespace": cluster},
        "userName": user,
        "clusterName": cluster,
        "roleTemplateName": role_template
    })
}
