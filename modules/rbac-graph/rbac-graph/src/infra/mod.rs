pub mod kube_reader;
pub mod memory;

pub use kube_reader::KubeClusterReader;
pub use memory::InMemoryClusterReader;
