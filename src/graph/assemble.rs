//! Graph assembler
//!
//! Concatenates the per-kind parts in a fixed order and collapses duplicate
//! edges. Edges carry only `(from, to, type)`, so full-tuple equality is the
//! dedup key; the result is sorted by that tuple.

use crate::graph::model::{Edge, GraphPart, ServiceMap};
use std::collections::BTreeSet;

/// Assemble parts into one map
///
/// Node order follows part order. Nodes are not deduplicated; kinds and
/// (namespace, name) pairs already make their ids unique.
pub fn assemble(parts: impl IntoIterator<Item = GraphPart>) -> ServiceMap {
    let mut nodes = Vec::new();
    let mut edges: BTreeSet<Edge> = BTreeSet::new();

    for part in parts {
        nodes.extend(part.nodes);
        edges.extend(part.edges);
    }

    ServiceMap {
        nodes,
        edges: edges.into_iter().collect(),
    }
}
