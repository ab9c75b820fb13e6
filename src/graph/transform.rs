//! Per-kind transformers
//!
//! Each transformer turns the items of one raw collection into typed nodes,
//! plus the edges that can be read off a single resource (pod volume mounts,
//! ingress routing rules). Relationships that need a second kind's data live in
//! `graph::link`.
//!
//! Transformers never fail: missing or malformed fields fall back to `None` or
//! an empty value and the node is still emitted.

use crate::graph::fields::ResourceItem;
use crate::graph::model::{Edge, EdgeType, GraphPart, Node, NodeAttributes};
use crate::models::ResourceKind;
use serde_json::Value;

/// Services: ports and selector, no edges
pub fn transform_services(items: &[Value]) -> GraphPart {
    let nodes = items
        .iter()
        .map(|value| {
            let item = ResourceItem::new(value);
            node_for(
                &item,
                NodeAttributes::Service {
                    ports: item.array_at(&["spec", "ports"]).to_vec(),
                    selector: item.labels_at(&["spec", "selector"]),
                },
            )
        })
        .collect();

    GraphPart {
        nodes,
        edges: Vec::new(),
    }
}

/// Pods: phase, labels and container names, plus a mount edge per
/// config map or secret volume
pub fn transform_pods(items: &[Value]) -> GraphPart {
    let mut part = GraphPart::default();

    for value in items {
        let item = ResourceItem::new(value);
        let containers = item
            .array_at(&["spec", "containers"])
            .iter()
            .filter_map(|container| container.get("name").and_then(|n| n.as_str()))
            .map(str::to_string)
            .collect();

        let node = node_for(
            &item,
            NodeAttributes::Pod {
                status: item.str_at(&["status", "phase"]).map(str::to_string),
                labels: item.labels(),
                containers,
            },
        );

        part.edges.extend(mount_edges(&node.id, &item));
        part.nodes.push(node);
    }

    part
}

/// Mount edges for one pod's volumes
///
/// Config map volumes name their target in `configMap.name`, secret volumes in
/// `secret.secretName`. The target always lives in the pod's namespace.
fn mount_edges(pod_id: &str, pod: &ResourceItem<'_>) -> Vec<Edge> {
    let namespace = pod.namespace();
    let mut edges = Vec::new();

    for volume in pod.array_at(&["spec", "volumes"]) {
        let volume = ResourceItem::new(volume);

        if let Some(config_map) = volume.str_at(&["configMap", "name"]) {
            edges.push(Edge::new(
                pod_id,
                ResourceKind::ConfigMap.node_id(namespace, Some(config_map)),
                EdgeType::Mount,
            ));
        }

        if let Some(secret) = volume.str_at(&["secret", "secretName"]) {
            edges.push(Edge::new(
                pod_id,
                ResourceKind::Secret.node_id(namespace, Some(secret)),
                EdgeType::Mount,
            ));
        }
    }

    edges
}

/// Deployments: replicas and match labels, no edges
///
/// Deployments are tied to services by `graph::link`; there is no direct
/// deployment-to-pod edge.
pub fn transform_deployments(items: &[Value]) -> GraphPart {
    let nodes = items
        .iter()
        .map(|value| {
            let item = ResourceItem::new(value);
            node_for(
                &item,
                NodeAttributes::Deployment {
                    replicas: item.i64_at(&["spec", "replicas"]),
                    match_labels: item.labels_at(&["spec", "selector", "matchLabels"]),
                },
            )
        })
        .collect();

    GraphPart {
        nodes,
        edges: Vec::new(),
    }
}

/// Ingresses: raw rules, plus a route edge per HTTP path backend service
///
/// Backend services are resolved in the ingress's own namespace.
pub fn transform_ingresses(items: &[Value]) -> GraphPart {
    let mut part = GraphPart::default();

    for value in items {
        let item = ResourceItem::new(value);
        let rules = item.array_at(&["spec", "rules"]);
        let node = node_for(
            &item,
            NodeAttributes::Ingress {
                rules: rules.to_vec(),
            },
        );

        for rule in rules {
            for path in ResourceItem::new(rule).array_at(&["http", "paths"]) {
                let backend = ResourceItem::new(path).str_at(&["backend", "service", "name"]);
                if let Some(service) = backend.filter(|name| !name.is_empty()) {
                    part.edges.push(Edge::new(
                        node.id.clone(),
                        ResourceKind::Service.node_id(item.namespace(), Some(service)),
                        EdgeType::Route,
                    ));
                }
            }
        }

        part.nodes.push(node);
    }

    part
}

/// Config maps: identity only
pub fn transform_config_maps(items: &[Value]) -> GraphPart {
    identity_nodes(items, || NodeAttributes::ConfigMap {})
}

/// Secrets: identity only, content is never read
pub fn transform_secrets(items: &[Value]) -> GraphPart {
    identity_nodes(items, || NodeAttributes::Secret {})
}

fn identity_nodes(items: &[Value], attributes: impl Fn() -> NodeAttributes) -> GraphPart {
    GraphPart {
        nodes: items
            .iter()
            .map(|value| node_for(&ResourceItem::new(value), attributes()))
            .collect(),
        edges: Vec::new(),
    }
}

fn node_for(item: &ResourceItem<'_>, attributes: NodeAttributes) -> Node {
    Node::new(item.name(), item.namespace(), attributes)
}
