//! Projects heterogeneous binding objects onto [`BindingRecord`].

use rbac_graph_sdk::{
    BindingKind, BindingObject, BindingRecord, ClusterRoleTemplateBinding, GlobalRoleBinding,
    ProjectRoleTemplateBinding,
};
use tracing::warn;

use super::aggregator::AggregateBindings;
use super::render::render;

/// Flatten an aggregate into the ordered record table.
///
/// Ids start at 0 and advance once per converted source object, so the two
/// records of a dual-role binding share theirs. Dynamic items that fail to
/// convert are skipped and do not consume an id.
#[must_use]
pub fn normalize(bindings: AggregateBindings) -> Vec<BindingRecord> {
    let AggregateBindings {
        mut cluster_role_bindings,
        mut role_bindings,
        global_role_bindings,
        project_role_template_bindings,
        cluster_role_template_bindings,
    } = bindings;

    let mut table = RecordTable::default();
    for kind in BindingKind::ALL {
        match kind {
            BindingKind::ClusterRoleBinding => {
                for crb in std::mem::take(&mut cluster_role_bindings) {
                    table.push(crb, kind);
                }
            }
            BindingKind::RoleBinding => {
                for rb in std::mem::take(&mut role_bindings) {
                    table.push(rb, kind);
                }
            }
            BindingKind::GlobalRoleBinding => {
                table.push_dynamic::<GlobalRoleBinding>(&global_role_bindings, kind);
            }
            BindingKind::ProjectRoleTemplateBinding => {
                table.push_dynamic::<ProjectRoleTemplateBinding>(
                    &project_role_template_bindings,
                    kind,
                );
            }
            BindingKind::ClusterRoleTemplateBinding => {
                table.push_dynamic::<ClusterRoleTemplateBinding>(
                    &cluster_role_template_bindings,
                    kind,
                );
            }
        }
    }
    table.records
}

/// Records produced from one source object: one per role reference.
#[must_use]
pub fn records_for<T: BindingObject>(
    mut object: T,
    kind: BindingKind,
    id: usize,
) -> Vec<BindingRecord> {
    object.clear_managed_fields();
    let raw = render(&object, kind.as_str(), kind.api_version());
    let name = object.object_name().to_owned();
    let subjects = object.subjects();

    object
        .role_refs()
        .into_iter()
        .map(|role_ref| BindingRecord {
            name: name.clone(),
            id,
            kind,
            subjects: subjects.clone(),
            role_ref,
            raw: raw.clone(),
        })
        .collect()
}

#[derive(Default)]
struct RecordTable {
    next_id: usize,
    records: Vec<BindingRecord>,
}

impl RecordTable {
    fn push<T: BindingObject>(&mut self, object: T, kind: BindingKind) {
        self.records.extend(records_for(object, kind, self.next_id));
        self.next_id += 1;
    }

    fn push_dynamic<T: BindingObject>(&mut self, items: &[serde_json::Value], kind: BindingKind) {
        for item in items {
            match serde_json::from_value::<T>(item.clone()) {
                Ok(object) => self.push(object, kind),
                Err(e) => {
                    let name = item
                        .pointer("/metadata/name")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or_default();
                    warn!(%kind, name, error = %e, "skipping binding that failed to convert");
                }
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::{
        cluster_role_binding, cluster_role_template_binding, global_role_binding,
        project_role_template_binding, role_binding,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ManagedFieldsEntry;
    use rbac_graph_sdk::{RoleReference, Subject};
    use tracing_test::traced_test;

    #[test]
    fn native_subjects_and_role_ref_pass_through() {
        let crb = cluster_role_binding(
            "ops",
            "ClusterRole",
            "admin",
            &[("User", "alice", None), ("ServiceAccount", "deployer", Some("ci"))],
        );
        let records = normalize(AggregateBindings {
            cluster_role_bindings: vec![crb],
            ..AggregateBindings::default()
        });

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "ops");
        assert_eq!(record.id, 0);
        assert_eq!(record.kind, BindingKind::ClusterRoleBinding);
        assert_eq!(
            record.role_ref,
            RoleReference::new("rbac.authorization.k8s.io", "ClusterRole", "admin")
        );
        assert_eq!(
            record.subjects,
            vec![
                Subject {
                    api_group: "rbac.authorization.k8s.io".to_owned(),
                    kind: "User".to_owned(),
                    name: "alice".to_owned(),
                    namespace: None,
                },
                Subject {
                    api_group: String::new(),
                    kind: "ServiceAccount".to_owned(),
                    name: "deployer".to_owned(),
                    namespace: Some("ci".to_owned()),
                },
            ]
        );
        assert!(record.raw.starts_with("kind: ClusterRoleBinding\napiVersion: rbac.authorization.k8s.io/v1\n"));
    }

    #[test]
    fn role_binding_subjects_and_role_ref_pass_through() {
        let rb = role_binding(
            "team-a",
            "readers",
            "Role",
            "viewer",
            &[("Group", "auditors", None), ("ServiceAccount", "bot", Some("team-a"))],
        );
        let records = normalize(AggregateBindings {
            role_bindings: vec![rb],
            ..AggregateBindings::default()
        });

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "readers");
        assert_eq!(record.kind, BindingKind::RoleBinding);
        assert_eq!(
            record.role_ref,
            RoleReference::new("rbac.authorization.k8s.io", "Role", "viewer")
        );
        let subjects: Vec<_> = record
            .subjects
            .iter()
            .map(|s| (s.kind.as_str(), s.name.as_str(), s.namespace.as_deref()))
            .collect();
        assert_eq!(
            subjects,
            vec![("Group", "auditors", None), ("ServiceAccount", "bot", Some("team-a"))]
        );
        assert!(record.raw.starts_with("kind: RoleBinding\napiVersion: rbac.authorization.k8s.io/v1\n"));
        assert!(record.raw.contains("namespace: team-a"));
    }

    #[test]
    fn global_role_binding_becomes_one_user_record() {
        let records = normalize(AggregateBindings {
            global_role_bindings: vec![global_role_binding("grb-1", "bob", "admin")],
            ..AggregateBindings::default()
        });

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, BindingKind::GlobalRoleBinding);
        assert_eq!(records[0].subjects.len(), 1);
        assert_eq!(records[0].subjects[0].kind, "User");
        assert_eq!(records[0].subjects[0].name, "bob");
        assert_eq!(records[0].role_ref.kind, "GlobalRole");
        assert_eq!(records[0].role_ref.name, "admin");
        assert_eq!(records[0].role_ref.api_group, "management.cattle.io");
        assert!(records[0].raw.starts_with("kind: GlobalRoleBinding\napiVersion: management.cattle.io/v3\n"));
    }

    #[test]
    fn dual_role_kinds_share_name_and_id() {
        let records = normalize(AggregateBindings {
            project_role_template_bindings: vec![project_role_template_binding(
                "prtb-1",
                "u-1",
                "c-1:p-1",
                "project-member",
            )],
            cluster_role_template_bindings: vec![cluster_role_template_binding(
                "crtb-1",
                "u-2",
                "c-1",
                "cluster-owner",
            )],
            ..AggregateBindings::default()
        });

        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.id, r.name.as_str(), r.role_ref.kind.as_str(), r.role_ref.name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, "prtb-1", "Project", "c-1:p-1"),
                (0, "prtb-1", "RoleTemplate", "project-member"),
                (1, "crtb-1", "Cluster", "c-1"),
                (1, "crtb-1", "RoleTemplate", "cluster-owner"),
            ]
        );
        assert_eq!(records[0].raw, records[1].raw);
        assert_eq!(records[0].subjects, records[1].subjects);
    }

    #[test]
    fn ids_follow_kind_order() {
        let records = normalize(AggregateBindings {
            cluster_role_bindings: vec![
                cluster_role_binding("c1", "ClusterRole", "view", &[]),
                cluster_role_binding("c2", "ClusterRole", "edit", &[]),
            ],
            role_bindings: vec![role_binding("ns", "r1", "Role", "viewer", &[])],
            global_role_bindings: vec![global_role_binding("g1", "bob", "admin")],
            ..AggregateBindings::default()
        });

        let ids: Vec<_> = records.iter().map(|r| (r.name.as_str(), r.id)).collect();
        assert_eq!(ids, vec![("c1", 0), ("c2", 1), ("r1", 2), ("g1", 3)]);
    }

    #[test]
    fn managed_fields_are_not_rendered() {
        let mut crb = cluster_role_binding("ops", "ClusterRole", "admin", &[]);
        crb.metadata.managed_fields = Some(vec![ManagedFieldsEntry::default()]);

        let records = records_for(crb, BindingKind::ClusterRoleBinding, 7);
        assert_eq!(records[0].id, 7);
        assert!(!records[0].raw.contains("managedFields"));
    }

    #[traced_test]
    #[test]
    fn bad_dynamic_item_is_skipped_without_consuming_an_id() {
        let records = normalize(AggregateBindings {
            global_role_bindings: vec![
                serde_json::json!({"metadata": {"name": "broken"}, "userName": 42}),
                global_role_binding("g1", "bob", "admin"),
            ],
            ..AggregateBindings::default()
        });

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "g1");
        assert_eq!(records[0].id, 0);
        assert!(logs_contain("skipping binding that failed to convert"));
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let build = || AggregateBindings {
            cluster_role_bindings: vec![cluster_role_binding(
                "ops",
                "ClusterRole",
                "admin",
                &[("Group", "sre", None)],
            )],
            project_role_template_bindings: vec![project_role_template_binding(
                "p",
                "u",
                "c:p",
                "member",
            )],
            ..AggregateBindings::default()
        };
        assert_eq!(normalize(build()), normalize(build()));
    }
}
