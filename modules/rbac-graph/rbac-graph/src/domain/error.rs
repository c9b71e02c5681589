//! Domain errors for the RBAC graph module.

use rbac_graph_sdk::{BindingKind, ClusterReadError, UnknownKindError};
use thiserror::Error;

/// Errors surfaced by [`super::RbacGraphService`].
///
/// Resolution misses and per-item conversion failures never appear here;
/// they are absorbed where they happen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("failed to list {kind}: {source}")]
    ClusterRead {
        kind: BindingKind,
        #[source]
        source: ClusterReadError,
    },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("empty input")]
    EmptyInput,

    #[error("invalid YAML format: {message}")]
    InvalidYaml { message: String },

    #[error("empty object")]
    EmptyObject,

    #[error("unsupported resource type: {kind}")]
    UnsupportedKind { kind: String },

    #[error("failed to convert to {kind}: {message}")]
    InvalidBinding { kind: BindingKind, message: String },
}

impl DomainError {
    #[must_use]
    pub fn cluster_read(kind: BindingKind, source: ClusterReadError) -> Self {
        Self::ClusterRead { kind, source }
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_yaml(message: impl Into<String>) -> Self {
        Self::InvalidYaml {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_binding(kind: BindingKind, message: impl Into<String>) -> Self {
        Self::InvalidBinding {
            kind,
            message: message.into(),
        }
    }

    /// `true` when the caller sent bad input, `false` for cluster failures.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::ClusterRead { .. })
    }
}

impl From<UnknownKindError> for DomainError {
    fn from(e: UnknownKindError) -> Self {
        Self::UnsupportedKind { kind: e.0 }
    }
}
