use std::collections::HashMap;

use crate::domain::topology::link::Link;
use crate::domain::utils::id::NodeId;

/// One traversable direction of an operational link.
///
/// In the outgoing list of node `n`, `peer` is the node reached from `n`. In the
/// incoming list of `n`, `peer` is the node the edge comes from. `cost` is always the
/// cost of the edge in its own direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub peer: usize,
    pub cost: u32,
    pub link: usize,
}

/// Directed adjacency derived from a link set.
///
/// Built once per topology snapshot and never patched: overrides produce a new
/// snapshot with a freshly built view. Edge lists keep link ingestion order, which
/// makes every traversal over them deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyView {
    outgoing: Vec<Vec<Edge>>,
    incoming: Vec<Vec<Edge>>,
}

impl AdjacencyView {
    /// Every `Up` link contributes `source -> target` weighted by its forward cost and
    /// `target -> source` weighted by its reverse cost. `Down` links contribute nothing.
    pub fn build(node_count: usize, node_index: &HashMap<NodeId, usize>, links: &[Link]) -> Self {
        let mut outgoing: Vec<Vec<Edge>> = vec![Vec::new(); node_count];
        let mut incoming: Vec<Vec<Edge>> = vec![Vec::new(); node_count];

        for (link_idx, link) in links.iter().enumerate() {
            if !link.is_up() {
                continue;
            }

            let (Some(&source), Some(&target)) = (node_index.get(&link.source), node_index.get(&link.target)) else {
                log::error!("Link {} references a node outside the topology; skipped in adjacency.", link.id);
                continue;
            };

            outgoing[source].push(Edge { peer: target, cost: link.forward_cost, link: link_idx });
            incoming[target].push(Edge { peer: source, cost: link.forward_cost, link: link_idx });

            outgoing[target].push(Edge { peer: source, cost: link.reverse_cost, link: link_idx });
            incoming[source].push(Edge { peer: target, cost: link.reverse_cost, link: link_idx });
        }

        Self { outgoing, incoming }
    }

    pub fn outgoing(&self, node: usize) -> &[Edge] {
        self.outgoing.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming(&self, node: usize) -> &[Edge] {
        self.incoming.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.outgoing(node).len()
    }

    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.outgoing.iter().map(Vec::len).sum()
    }
}
