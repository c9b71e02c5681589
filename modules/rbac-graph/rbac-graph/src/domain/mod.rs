pub mod aggregator;
pub mod error;
pub mod normalizer;
pub mod render;
pub mod resolver;
pub mod service;
pub mod what_if;

pub use error::DomainError;
pub use service::RbacGraphService;
