//! Kubernetes Service Map Library
//!
//! Snapshots services, pods, deployments, ingresses, config maps and secrets
//! into a typed node/edge graph and serves it over HTTP.
//! It can be used both as a binary and as a library for testing.

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod kube;
pub mod models;
pub mod server;

// Re-export commonly used types for convenience
pub use error::{ServiceMapError, ServiceMapResult};
pub use graph::{
    Edge, EdgeType, FetchMode, Node, NodeAttributes, ResourceCollections, ServiceMap,
    build_service_map, derive_service_map,
};
pub use kube::{FetchError, KubeResourceFetcher, ResourceFetcher};
pub use models::ResourceKind;
