//! What-if evaluation of a candidate binding.
//!
//! The candidate is never applied; the cluster is only read to check that
//! the subjects and roles it references exist.

use rbac_graph_sdk::{
    BindingKind, BindingObject, ClusterRoleTemplateBinding, GlobalRoleBinding, Graph, Node,
    ProjectRoleTemplateBinding, RbacBinding,
};
use serde::de::DeserializeOwned;

use super::error::DomainError;
use super::resolver::ReferenceResolver;

/// A parsed candidate, typed by its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateBinding {
    ClusterRoleBinding(RbacBinding),
    RoleBinding(RbacBinding),
    GlobalRoleBinding(GlobalRoleBinding),
    ProjectRoleTemplateBinding(ProjectRoleTemplateBinding),
    ClusterRoleTemplateBinding(ClusterRoleTemplateBinding),
}

/// A candidate plus the `apiVersion` it was submitted with.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCandidate {
    pub binding: CandidateBinding,
    pub api_version: String,
}

/// Parse one YAML document into a typed candidate.
///
/// # Errors
///
/// - [`DomainError::EmptyInput`] for blank input
/// - [`DomainError::InvalidYaml`] when the text is not YAML
/// - [`DomainError::EmptyObject`] when the document is not a mapping
/// - [`DomainError::UnsupportedKind`] for a `kind` outside the five binding kinds
/// - [`DomainError::InvalidBinding`] when the fields do not fit the kind's schema
pub fn parse_candidate(yaml: &str) -> Result<ParsedCandidate, DomainError> {
    if yaml.trim().is_empty() {
        return Err(DomainError::EmptyInput);
    }

    let document: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| DomainError::invalid_yaml(e.to_string()))?;
    let serde_yaml::Value::Mapping(fields) = &document else {
        return Err(DomainError::EmptyObject);
    };

    let kind_field = fields
        .get("kind")
        .and_then(serde_yaml::Value::as_str)
        .unwrap_or_default();
    let kind: BindingKind = kind_field.parse()?;
    let api_version = fields
        .get("apiVersion")
        .and_then(serde_yaml::Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let binding = match kind {
        BindingKind::ClusterRoleBinding => {
            CandidateBinding::ClusterRoleBinding(typed(kind, document)?)
        }
        BindingKind::RoleBinding => CandidateBinding::RoleBinding(typed(kind, document)?),
        BindingKind::GlobalRoleBinding => {
            CandidateBinding::GlobalRoleBinding(typed(kind, document)?)
        }
        BindingKind::ProjectRoleTemplateBinding => {
            CandidateBinding::ProjectRoleTemplateBinding(typed(kind, document)?)
        }
        BindingKind::ClusterRoleTemplateBinding => {
            CandidateBinding::ClusterRoleTemplateBinding(typed(kind, document)?)
        }
    };

    Ok(ParsedCandidate {
        binding,
        api_version,
    })
}

fn typed<T: DeserializeOwned>(
    kind: BindingKind,
    document: serde_yaml::Value,
) -> Result<T, DomainError> {
    serde_yaml::from_value(document).map_err(|e| DomainError::invalid_binding(kind, e.to_string()))
}

/// Build the graph a candidate would add.
pub async fn build_graph(resolver: &ReferenceResolver<'_>, candidate: &ParsedCandidate) -> Graph {
    let api_version = candidate.api_version.as_str();
    match &candidate.binding {
        CandidateBinding::ClusterRoleBinding(b) => {
            build(resolver, b, BindingKind::ClusterRoleBinding, api_version).await
        }
        CandidateBinding::RoleBinding(b) => {
            build(resolver, b, BindingKind::RoleBinding, api_version).await
        }
        CandidateBinding::GlobalRoleBinding(b) => {
            build(resolver, b, BindingKind::GlobalRoleBinding, api_version).await
        }
        CandidateBinding::ProjectRoleTemplateBinding(b) => {
            build(resolver, b, BindingKind::ProjectRoleTemplateBinding, api_version).await
        }
        CandidateBinding::ClusterRoleTemplateBinding(b) => {
            build(resolver, b, BindingKind::ClusterRoleTemplateBinding, api_version).await
        }
    }
}

async fn build<T: BindingObject + Sync>(
    resolver: &ReferenceResolver<'_>,
    binding: &T,
    kind: BindingKind,
    api_version: &str,
) -> Graph {
    let root = Node::new(kind.as_str(), api_version, binding.object_name());
    let root_id = root.id.clone();

    let mut graph = Graph::default();
    graph.nodes.push(root);

    for subject in binding.subjects() {
        if let Some(node) = resolver.resolve_subject(&subject).await {
            graph.attach(&root_id, node);
        }
    }
    for role_ref in binding.role_refs() {
        if let Some(node) = resolver.resolve_role_ref(&role_ref).await {
            graph.attach(&root_id, node);
        }
    }

    tracing::debug!(
        root = %root_id,
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "built what-if graph"
    );
    graph
}
