//! Error types for the RBAC graph SDK.

use thiserror::Error;

/// Errors returned by a [`crate::ClusterReader`].
///
/// These represent lookup and transport failures only. Whether a failure is
/// fatal is decided by the caller: list failures abort an aggregate, lookup
/// failures during what-if resolution only drop a node.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClusterReadError {
    /// The requested object does not exist.
    #[error("{resource} '{name}' not found")]
    NotFound { resource: String, name: String },

    /// The API server answered with an error status (403, 500, ...).
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API server could not be reached or the response could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClusterReadError {
    pub fn not_found(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A `kind` string that is not one of the supported binding kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported resource type: {0}")]
pub struct UnknownKindError(pub String);
