use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::routing::distance::Distance;
use crate::domain::routing::path::PathResult;
use crate::domain::topology::adjacency::Edge;
use crate::domain::topology::network_topology::NetworkTopology;
use crate::domain::utils::id::{LinkId, NodeId};
use crate::error::Result;

const INFINITE: u64 = u64::MAX;

#[derive(Debug, PartialEq, Eq)]
struct State {
    cost: u64,
    node: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap; lower node index wins ties.
        other.cost.cmp(&self.cost).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One settled node of a traced Dijkstra run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceStep {
    pub step: usize,
    pub settled: NodeId,
    pub distance: u64,
    pub relaxations: Vec<Relaxation>,

    /// Queue entries left after this step, stale ones included.
    pub frontier_size: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relaxation {
    pub neighbor: NodeId,
    pub via_link: LinkId,
    pub edge_cost: u32,
    pub previous: Distance,
    pub candidate: u64,
    pub improved: bool,
}

/// Step-by-step record of a single-target Dijkstra run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DijkstraTrace {
    pub source: NodeId,
    pub target: NodeId,
    pub steps: Vec<TraceStep>,
    pub total_cost: Distance,
    pub path: Option<PathResult>,
}

struct Search {
    dist: Vec<u64>,
    /// The edge used to reach each node, as seen from its predecessor.
    via: Vec<Option<(usize, Edge)>>,
}

impl Search {
    fn path_to(&self, topology: &NetworkTopology, source: usize, target: usize) -> Option<PathResult> {
        if self.dist[target] == INFINITE {
            return None;
        }

        let mut edges = Vec::new();
        let mut current = target;
        while current != source {
            let (prev, edge) = self.via[current]?;
            edges.push(edge);
            current = prev;
        }
        edges.reverse();

        Some(PathResult::from_edges(topology, source, &edges))
    }
}

/// Classic Dijkstra over the outgoing edges. Stops as soon as `target` is settled.
fn search(topology: &NetworkTopology, source: usize, target: Option<usize>, mut trace: Option<&mut Vec<TraceStep>>) -> Search {
    let adjacency = topology.adjacency();
    let n = adjacency.node_count();

    let mut dist = vec![INFINITE; n];
    let mut via: Vec<Option<(usize, Edge)>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[source] = 0;
    heap.push(State { cost: 0, node: source });

    while let Some(State { cost, node }) = heap.pop() {
        if settled[node] || cost > dist[node] {
            continue;
        }
        settled[node] = true;

        let mut relaxations = Vec::new();

        for edge in adjacency.outgoing(node) {
            if settled[edge.peer] {
                continue;
            }

            let candidate = cost + edge.cost as u64;
            let previous = dist[edge.peer];
            let improved = candidate < previous;

            if improved {
                dist[edge.peer] = candidate;
                via[edge.peer] = Some((node, *edge));
                heap.push(State { cost: candidate, node: edge.peer });
            }

            if trace.is_some() {
                relaxations.push(Relaxation {
                    neighbor: topology.node_at(edge.peer).id.clone(),
                    via_link: topology.link_at(edge.link).id.clone(),
                    edge_cost: edge.cost,
                    previous: Distance::from_raw(previous),
                    candidate,
                    improved,
                });
            }
        }

        if let Some(steps) = trace.as_deref_mut() {
            steps.push(TraceStep {
                step: steps.len() + 1,
                settled: topology.node_at(node).id.clone(),
                distance: cost,
                relaxations,
                frontier_size: heap.len(),
            });
        }

        if Some(node) == target {
            break;
        }
    }

    Search { dist, via }
}

/// Exact remaining cost from every node to `target`, via Dijkstra over incoming edges.
pub(crate) fn distances_to(topology: &NetworkTopology, target: usize) -> Vec<u64> {
    let adjacency = topology.adjacency();
    let mut dist = vec![INFINITE; adjacency.node_count()];
    let mut heap = BinaryHeap::new();

    dist[target] = 0;
    heap.push(State { cost: 0, node: target });

    while let Some(State { cost, node }) = heap.pop() {
        if cost > dist[node] {
            continue;
        }

        for edge in adjacency.incoming(node) {
            let candidate = cost + edge.cost as u64;
            if candidate < dist[edge.peer] {
                dist[edge.peer] = candidate;
                heap.push(State { cost: candidate, node: edge.peer });
            }
        }
    }

    dist
}

/// Minimum total cost from `source` to `target`.
///
/// Returns `Distance::Unreachable` when no operational route exists and
/// `Error::UnknownNodeId` when either endpoint is not in the topology.
pub fn shortest_cost(topology: &NetworkTopology, source: &NodeId, target: &NodeId) -> Result<Distance> {
    let source_idx = topology.index_of(source)?;
    let target_idx = topology.index_of(target)?;

    let result = search(topology, source_idx, Some(target_idx), None);
    Ok(Distance::from_raw(result.dist[target_idx]))
}

/// One minimum-cost route from `source` to `target`, or `None` when unreachable.
pub fn shortest_path(topology: &NetworkTopology, source: &NodeId, target: &NodeId) -> Result<Option<PathResult>> {
    let source_idx = topology.index_of(source)?;
    let target_idx = topology.index_of(target)?;

    let result = search(topology, source_idx, Some(target_idx), None);
    Ok(result.path_to(topology, source_idx, target_idx))
}

/// Records every settle and relaxation on the way from `source` to `target`.
pub fn dijkstra_trace(topology: &NetworkTopology, source: &NodeId, target: &NodeId) -> Result<DijkstraTrace> {
    let source_idx = topology.index_of(source)?;
    let target_idx = topology.index_of(target)?;

    let mut steps = Vec::new();
    let result = search(topology, source_idx, Some(target_idx), Some(&mut steps));

    Ok(DijkstraTrace {
        source: source.clone(),
        target: target.clone(),
        steps,
        total_cost: Distance::from_raw(result.dist[target_idx]),
        path: result.path_to(topology, source_idx, target_idx),
    })
}

/// Single-source distances to every node of a topology.
pub struct ShortestPathTree<'a> {
    topology: &'a NetworkTopology,
    source: usize,
    search: Search,
}

pub fn shortest_path_tree<'a>(topology: &'a NetworkTopology, source: &NodeId) -> Result<ShortestPathTree<'a>> {
    let source_idx = topology.index_of(source)?;
    let search = search(topology, source_idx, None, None);
    Ok(ShortestPathTree { topology, source: source_idx, search })
}

impl<'a> ShortestPathTree<'a> {
    pub fn source(&self) -> &NodeId {
        &self.topology.node_at(self.source).id
    }

    pub fn distance_to(&self, target: &NodeId) -> Result<Distance> {
        let idx = self.topology.index_of(target)?;
        Ok(Distance::from_raw(self.search.dist[idx]))
    }

    pub fn path_to(&self, target: &NodeId) -> Result<Option<PathResult>> {
        let idx = self.topology.index_of(target)?;
        Ok(self.search.path_to(self.topology, self.source, idx))
    }

    pub(crate) fn distance_at(&self, idx: usize) -> Distance {
        Distance::from_raw(self.search.dist[idx])
    }

    /// Every node with its distance, in topology order.
    pub fn distances(&self) -> Vec<(&'a NodeId, Distance)> {
        self.topology.nodes().iter().zip(&self.search.dist).map(|(node, &d)| (&node.id, Distance::from_raw(d))).collect()
    }
}
