//! Service map derivation
//!
//! Fetches the six resource collections, transforms each into typed nodes,
//! links them across kinds, and assembles one deduplicated graph. Every call
//! starts from a fresh fetch; nothing is cached between calls.

pub mod assemble;
pub mod fields;
pub mod link;
pub mod model;
pub mod transform;

pub use model::{
    Edge, EdgeType, GraphPart, Labels, Node, NodeAttributes, ServiceMap, ServiceMapSummary,
};

use crate::error::{ServiceMapError, ServiceMapResult};
use crate::kube::ResourceFetcher;
use crate::models::ResourceKind;
use serde_json::Value;

/// How the six collections are listed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// One kind after another, in assembly order
    #[default]
    Sequential,
    /// All six in flight at once; the first failure to arrive wins
    Concurrent,
}

impl FetchMode {
    pub fn from_concurrent(concurrent: bool) -> Self {
        if concurrent {
            FetchMode::Concurrent
        } else {
            FetchMode::Sequential
        }
    }
}

/// Raw list documents, one per kind
#[derive(Debug, Clone, Default)]
pub struct ResourceCollections {
    pub services: Value,
    pub pods: Value,
    pub deployments: Value,
    pub ingresses: Value,
    pub config_maps: Value,
    pub secrets: Value,
}

/// List all six collections, aborting on the first failure
pub async fn fetch_collections(
    fetcher: &dyn ResourceFetcher,
    mode: FetchMode,
) -> ServiceMapResult<ResourceCollections> {
    let collections = match mode {
        FetchMode::Sequential => ResourceCollections {
            services: fetcher.list_all(ResourceKind::Service).await?,
            pods: fetcher.list_all(ResourceKind::Pod).await?,
            deployments: fetcher.list_all(ResourceKind::Deployment).await?,
            ingresses: fetcher.list_all(ResourceKind::Ingress).await?,
            config_maps: fetcher.list_all(ResourceKind::ConfigMap).await?,
            secrets: fetcher.list_all(ResourceKind::Secret).await?,
        },
        FetchMode::Concurrent => {
            let (services, pods, deployments, ingresses, config_maps, secrets) = futures::try_join!(
                fetcher.list_all(ResourceKind::Service),
                fetcher.list_all(ResourceKind::Pod),
                fetcher.list_all(ResourceKind::Deployment),
                fetcher.list_all(ResourceKind::Ingress),
                fetcher.list_all(ResourceKind::ConfigMap),
                fetcher.list_all(ResourceKind::Secret),
            )?;
            ResourceCollections {
                services,
                pods,
                deployments,
                ingresses,
                config_maps,
                secrets,
            }
        }
    };

    Ok(collections)
}

/// Derive the service map from already-fetched collections
///
/// Pure computation. Fails only when a collection is not a list document.
pub fn derive_service_map(collections: &ResourceCollections) -> ServiceMapResult<ServiceMap> {
    use ResourceKind::*;

    let mut services = transform::transform_services(items_of(Service, &collections.services)?);
    let pods = transform::transform_pods(items_of(Pod, &collections.pods)?);
    let mut deployments =
        transform::transform_deployments(items_of(Deployment, &collections.deployments)?);
    let ingresses = transform::transform_ingresses(items_of(Ingress, &collections.ingresses)?);
    let config_maps =
        transform::transform_config_maps(items_of(ConfigMap, &collections.config_maps)?);
    let secrets = transform::transform_secrets(items_of(Secret, &collections.secrets)?);

    let selector_edges = link::link_services_to_pods(&services.nodes, &pods.nodes);
    let manages_edges = link::link_deployments_to_services(&deployments.nodes, &services.nodes);
    services.edges.extend(selector_edges);
    deployments.edges.extend(manages_edges);

    Ok(assemble::assemble([
        services,
        pods,
        deployments,
        ingresses,
        config_maps,
        secrets,
    ]))
}

/// Fetch everything and derive a fresh service map
pub async fn build_service_map(
    fetcher: &dyn ResourceFetcher,
    mode: FetchMode,
) -> ServiceMapResult<ServiceMap> {
    let collections = fetch_collections(fetcher, mode).await?;
    let map = derive_service_map(&collections)?;

    tracing::info!(
        nodes = map.nodes.len(),
        edges = map.edges.len(),
        "Built service map: {}",
        map.summary()
    );

    Ok(map)
}

fn items_of(kind: ResourceKind, list: &Value) -> ServiceMapResult<&[Value]> {
    let items = fields::list_items(list).ok_or_else(|| {
        ServiceMapError::Unexpected(anyhow::anyhow!(
            "{} list has a non-array items field",
            kind
        ))
    })?;
    tracing::debug!("Transforming {} {} items", items.len(), kind);
    Ok(items)
}
