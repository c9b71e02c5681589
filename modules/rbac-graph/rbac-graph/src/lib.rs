//! RBAC Graph Module
//!
//! Lists every binding-like object of a Kubernetes/Rancher cluster as a
//! uniform [`rbac_graph_sdk::BindingRecord`] table, and previews the access
//! graph a candidate binding would create before it is applied.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;

#[cfg(test)]
mod test_support;

pub use domain::{DomainError, RbacGraphService};
