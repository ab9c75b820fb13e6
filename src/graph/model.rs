//! Graph data structures for the service map
//!
//! Nodes and edges serialize straight into the JSON document served to
//! visualization clients: `{"nodes": [...], "edges": [...]}`.

use crate::models::ResourceKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Label and selector maps, ordered so serialized output is stable
///
/// Values are kept exactly as listed: a selector value `3` never equals the
/// label string `"3"`.
pub type Labels = BTreeMap<String, Value>;

/// A node in the service map, one per cluster resource instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// `{kind}_{namespace}_{name}`
    pub id: String,
    pub name: Option<String>,
    pub namespace: Option<String>,
    /// Kind tag (`type`) plus kind-specific attributes
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

/// Kind-specific node attributes
///
/// Config maps and secrets are referenced by identity only; secret content is
/// never carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeAttributes {
    Service {
        /// Raw `spec.ports` entries
        ports: Vec<Value>,
        selector: Labels,
    },
    Pod {
        /// `status.phase`
        status: Option<String>,
        labels: Labels,
        containers: Vec<String>,
    },
    Deployment {
        replicas: Option<i64>,
        /// `spec.selector.matchLabels`
        match_labels: Labels,
    },
    Ingress {
        /// Raw `spec.rules` entries
        rules: Vec<Value>,
    },
    ConfigMap {},
    Secret {},
}

impl NodeAttributes {
    pub fn kind(&self) -> ResourceKind {
        match self {
            NodeAttributes::Service { .. } => ResourceKind::Service,
            NodeAttributes::Pod { .. } => ResourceKind::Pod,
            NodeAttributes::Deployment { .. } => ResourceKind::Deployment,
            NodeAttributes::Ingress { .. } => ResourceKind::Ingress,
            NodeAttributes::ConfigMap {} => ResourceKind::ConfigMap,
            NodeAttributes::Secret {} => ResourceKind::Secret,
        }
    }
}

impl Node {
    /// Create a node, deriving its id from kind, namespace and name
    pub fn new(name: Option<&str>, namespace: Option<&str>, attributes: NodeAttributes) -> Self {
        Self {
            id: attributes.kind().node_id(namespace, name),
            name: name.map(str::to_string),
            namespace: namespace.map(str::to_string),
            attributes,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.attributes.kind()
    }
}

/// Type of relationship between two nodes
///
/// Declaration order is the tie-breaking order when edges are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Ingress routes traffic to a service
    Route,
    /// Service selects a pod by labels
    Selector,
    /// Deployment backs a service
    Manages,
    /// Pod mounts a config map or secret volume
    Mount,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Route => "route",
            EdgeType::Selector => "selector",
            EdgeType::Manages => "manages",
            EdgeType::Mount => "mount",
        }
    }
}

/// A directed, typed relation between two node ids
///
/// Endpoints are ids only and may reference nodes absent from the snapshot.
/// Field order gives the derived ordering `(from, to, type)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            edge_type,
        }
    }
}

/// Nodes and edges produced for one slice of the graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphPart {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The assembled service map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceMap {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Counts per node kind and edge type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceMapSummary {
    pub nodes: BTreeMap<ResourceKind, usize>,
    pub edges: BTreeMap<EdgeType, usize>,
}

impl ServiceMap {
    pub fn summary(&self) -> ServiceMapSummary {
        let mut summary = ServiceMapSummary::default();
        for node in &self.nodes {
            *summary.nodes.entry(node.kind()).or_default() += 1;
        }
        for edge in &self.edges {
            *summary.edges.entry(edge.edge_type).or_default() += 1;
        }
        summary
    }
}

impl std::fmt::Display for ServiceMapSummary {
    /// `service=1 pod=2 ... secret=0; selector=2 mount=1`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nodes: Vec<String> = ResourceKind::all()
            .iter()
            .map(|kind| format!("{}={}", kind, self.nodes.get(kind).copied().unwrap_or(0)))
            .collect();
        let edges: Vec<String> = self
            .edges
            .iter()
            .map(|(edge_type, count)| format!("{}={}", edge_type.as_str(), count))
            .collect();

        write!(f, "{}", nodes.join(" "))?;
        if !edges.is_empty() {
            write!(f, "; {}", edges.join(" "))?;
        }
        Ok(())
    }
}
