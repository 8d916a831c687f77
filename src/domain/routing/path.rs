use serde::Serialize;

use crate::domain::topology::adjacency::Edge;
use crate::domain::topology::network_topology::NetworkTopology;
use crate::domain::utils::id::{LinkId, NodeId, PathId};

/// A simple path between two routers.
///
/// `nodes` starts at the source and ends at the target without repeats. `hop_costs[i]`
/// is the directional cost paid to go from `nodes[i]` to `nodes[i + 1]` over
/// `links[i]`, and `total_cost` is their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    /// Derived from the node sequence, so the same route always gets the same id.
    pub id: PathId,
    pub nodes: Vec<NodeId>,
    pub links: Vec<LinkId>,
    pub hop_costs: Vec<u32>,
    pub total_cost: u64,
    pub hop_count: usize,
}

impl PathResult {
    /// Builds a path from a start node and the edges walked from it.
    pub(crate) fn from_edges(topology: &NetworkTopology, start: usize, edges: &[Edge]) -> Self {
        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(topology.node_at(start).id.clone());

        let mut links = Vec::with_capacity(edges.len());
        let mut hop_costs = Vec::with_capacity(edges.len());

        for edge in edges {
            nodes.push(topology.node_at(edge.peer).id.clone());
            links.push(topology.link_at(edge.link).id.clone());
            hop_costs.push(edge.cost);
        }

        let total_cost = hop_costs.iter().map(|&c| c as u64).sum();

        Self { id: Self::path_id(&nodes), hop_count: edges.len(), nodes, links, hop_costs, total_cost }
    }

    pub fn path_id(nodes: &[NodeId]) -> PathId {
        PathId::new(nodes.iter().map(NodeId::as_str).collect::<Vec<_>>().join("->"))
    }

    pub fn source(&self) -> &NodeId {
        &self.nodes[0]
    }

    pub fn target(&self) -> &NodeId {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Nodes strictly between source and target.
    pub fn transit_nodes(&self) -> &[NodeId] {
        if self.nodes.len() <= 2 { &[] } else { &self.nodes[1..self.nodes.len() - 1] }
    }

    pub fn is_simple(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.nodes.len());
        self.nodes.iter().all(|n| seen.insert(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_id_is_stable_join() {
        let nodes = vec![NodeId::new("A"), NodeId::new("B"), NodeId::new("C")];
        assert_eq!(PathResult::path_id(&nodes).as_str(), "A->B->C");
        assert_eq!(PathResult::path_id(&nodes), PathResult::path_id(&nodes.clone()));
    }
}
