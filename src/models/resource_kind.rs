//! Resource kind definitions
//!
//! Centralized enum for the six Kubernetes kinds that make up the service map.
//! The lowercase tag doubles as the node `type` and as the prefix of every node id,
//! so nothing outside this module spells those strings out by hand.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Enumeration of the resource kinds modeled in the service map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Service,
    Pod,
    Deployment,
    Ingress,
    ConfigMap,
    Secret,
}

impl ResourceKind {
    /// Get the lowercase tag used for node types and ids
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Service => "service",
            ResourceKind::Pod => "pod",
            ResourceKind::Deployment => "deployment",
            ResourceKind::Ingress => "ingress",
            ResourceKind::ConfigMap => "configmap",
            ResourceKind::Secret => "secret",
        }
    }

    /// All kinds, in graph assembly order
    pub fn all() -> &'static [Self] {
        &[
            ResourceKind::Service,
            ResourceKind::Pod,
            ResourceKind::Deployment,
            ResourceKind::Ingress,
            ResourceKind::ConfigMap,
            ResourceKind::Secret,
        ]
    }

    /// Build the node id `{kind}_{namespace}_{name}`
    ///
    /// Missing metadata renders as an empty segment rather than failing,
    /// e.g. a pod without a namespace becomes `pod__web`.
    pub fn node_id(&self, namespace: Option<&str>, name: Option<&str>) -> String {
        format!(
            "{}_{}_{}",
            self.as_str(),
            namespace.unwrap_or_default(),
            name.unwrap_or_default()
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(ResourceKind::Service.as_str(), "service");
        assert_eq!(ResourceKind::ConfigMap.as_str(), "configmap");
        assert_eq!(ResourceKind::Secret.as_str(), "secret");
    }

    #[test]
    fn test_all_in_assembly_order() {
        let tags: Vec<&str> = ResourceKind::all().iter().map(|k| k.as_str()).collect();
        assert_eq!(
            tags,
            vec!["service", "pod", "deployment", "ingress", "configmap", "secret"]
        );
    }

    #[test]
    fn test_node_id() {
        assert_eq!(
            ResourceKind::Service.node_id(Some("ns-1"), Some("service-1")),
            "service_ns-1_service-1"
        );
        assert_eq!(ResourceKind::Pod.node_id(None, Some("web")), "pod__web");
        assert_eq!(ResourceKind::Secret.node_id(None, None), "secret__");
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&ResourceKind::ConfigMap).unwrap();
        assert_eq!(json, "\"configmap\"");
    }
}
