//! Cross-resource linker
//!
//! Derives the edges no single resource states outright, by correlating the
//! label data of two transformed node sets. Both rules use one-directional
//! subset matching: every key/value of the querying side's selector must be
//! present and equal on the target. Values compare as raw JSON.
//!
//! Matching is a nested scan, O(services x pods x selector size). That is fine
//! for a point-in-time snapshot of one cluster.

use crate::graph::model::{Edge, EdgeType, Labels, Node, NodeAttributes};

/// True when every entry of `subset` is present and equal in `labels`
///
/// Vacuously true for an empty `subset`.
pub fn is_subset(subset: &Labels, labels: &Labels) -> bool {
    subset
        .iter()
        .all(|(key, value)| labels.get(key) == Some(value))
}

/// True when a service `selector` selects `labels`; an empty selector selects nothing
pub fn selector_matches(selector: &Labels, labels: &Labels) -> bool {
    !selector.is_empty() && is_subset(selector, labels)
}

/// `selector` edges: service -> pod, for every pod a service's selector matches
///
/// Namespaces are not compared; only labels decide.
pub fn link_services_to_pods(services: &[Node], pods: &[Node]) -> Vec<Edge> {
    let selectors: Vec<(&str, &Labels)> = services
        .iter()
        .filter_map(|service| match &service.attributes {
            NodeAttributes::Service { selector, .. } if !selector.is_empty() => {
                Some((service.id.as_str(), selector))
            }
            _ => None,
        })
        .collect();

    let mut edges = Vec::new();
    for pod in pods {
        let NodeAttributes::Pod { labels, .. } = &pod.attributes else {
            continue;
        };
        for (service_id, selector) in &selectors {
            if selector_matches(selector, labels) {
                edges.push(Edge::new(*service_id, pod.id.clone(), EdgeType::Selector));
            }
        }
    }
    edges
}

/// `manages` edges: deployment -> service, for every service in the
/// deployment's namespace whose selector is contained in the deployment's
/// match labels
///
/// Deployments without match labels link to nothing, and a label match across
/// namespaces is not a match. A service without a selector is contained in any
/// non-empty match labels of its namespace.
pub fn link_deployments_to_services(deployments: &[Node], services: &[Node]) -> Vec<Edge> {
    let mut edges = Vec::new();

    for deployment in deployments {
        let NodeAttributes::Deployment { match_labels, .. } = &deployment.attributes else {
            continue;
        };
        if match_labels.is_empty() {
            continue;
        }

        for service in services {
            let NodeAttributes::Service { selector, .. } = &service.attributes else {
                continue;
            };
            if service.namespace != deployment.namespace {
                continue;
            }
            if is_subset(selector, match_labels) {
                edges.push(Edge::new(
                    deployment.id.clone(),
                    service.id.clone(),
                    EdgeType::Manages,
                ));
            }
        }
    }

    edges
}
