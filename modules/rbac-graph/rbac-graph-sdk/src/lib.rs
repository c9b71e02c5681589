#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! RBAC Graph SDK
//!
//! This crate provides the public API for the `rbac_graph` module:
//!
//! - [`ClusterReader`] - Read-only cluster access consumed by the module
//! - [`BindingKind`], [`ApiTarget`] - The five supported binding kinds
//! - [`BindingRecord`], [`Subject`], [`RoleReference`] - Normalized list view
//! - [`Graph`], [`Node`], [`Link`] - What-if graph
//! - [`BindingObject`] and the platform manifests - Typed binding schemas
//! - [`ClusterReadError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use rbac_graph_sdk::{BindingKind, ClusterReader};
//!
//! let reader: Arc<dyn ClusterReader> = Arc::new(KubeClusterReader::new(client));
//! let crbs = reader.list_cluster_role_bindings().await?;
//! let prtbs = reader
//!     .list_dynamic(&BindingKind::ProjectRoleTemplateBinding.dynamic_target().unwrap())
//!     .await?;
//! ```

pub mod api;
pub mod error;
pub mod kinds;
pub mod manifests;
pub mod models;

// Re-export main types at crate root
pub use api::ClusterReader;
pub use error::{ClusterReadError, UnknownKindError};
pub use kinds::{ApiTarget, BindingKind};
pub use manifests::{
    BindingObject, ClusterRoleTemplateBinding, GlobalRoleBinding, ProjectRoleTemplateBinding,
    RbacBinding,
};
pub use models::{BindingRecord, Graph, Link, Node, RoleReference, Subject};
