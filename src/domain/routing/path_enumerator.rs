use std::collections::HashSet;

use crate::config::EnumerationConfig;
use crate::domain::routing::dijkstra::distances_to;
use crate::domain::routing::path::PathResult;
use crate::domain::topology::adjacency::Edge;
use crate::domain::topology::network_topology::NetworkTopology;
use crate::domain::utils::id::NodeId;
use crate::error::Result;

const UNREACHABLE: u64 = u64::MAX;

/// Up to `limit` simple paths from `source` to `target`, cheapest first, with the
/// default enumeration bounds.
pub fn find_paths(topology: &NetworkTopology, source: &NodeId, target: &NodeId, limit: usize) -> Result<Vec<PathResult>> {
    find_paths_with(topology, source, target, limit, &EnumerationConfig::default())
}

/// Bounded k-path enumeration.
///
/// The search is a depth-first backtracking walk with an on-path set, so every result
/// is a simple path. Work is bounded three ways:
/// * branches that cannot reach `target` at all are never entered (one reverse Dijkstra
///   gives the exact remaining cost from every node),
/// * collection stops once `config.candidate_bound(limit)` candidates are found,
/// * the walk aborts after `config.max_expansions` edge expansions.
///
/// Neighbours are tried in ascending `edge cost + remaining cost` order. With exact
/// remaining costs the first descent follows a shortest route, so the first candidate
/// is always optimal and the ranked result starts with the true shortest path.
///
/// Candidates are stably sorted by `total_cost` and truncated to `limit`: equal-cost
/// paths keep discovery order. `limit == 0` and unreachable targets both yield an
/// empty list. `source == target` yields the single zero-hop path.
pub fn find_paths_with(
    topology: &NetworkTopology,
    source: &NodeId,
    target: &NodeId,
    limit: usize,
    config: &EnumerationConfig,
) -> Result<Vec<PathResult>> {
    let source_idx = topology.index_of(source)?;
    let target_idx = topology.index_of(target)?;

    if limit == 0 {
        return Ok(Vec::new());
    }

    if source_idx == target_idx {
        return Ok(vec![PathResult::from_edges(topology, source_idx, &[])]);
    }

    let remaining = distances_to(topology, target_idx);
    if remaining[source_idx] == UNREACHABLE {
        log::debug!("NoPathFound: {} => {}", source, target);
        return Ok(Vec::new());
    }

    let ordered = ordered_edges(topology, &remaining);
    let bound = config.candidate_bound(limit);

    let mut candidates: Vec<PathResult> = Vec::new();
    let mut on_path = vec![false; topology.node_count()];
    let mut edges: Vec<Edge> = Vec::new();
    let mut stack: Vec<(usize, usize)> = vec![(source_idx, 0)];
    let mut expansions: usize = 0;

    on_path[source_idx] = true;

    while let Some(frame) = stack.last_mut() {
        let node = frame.0;

        let Some(edge) = ordered[node].get(frame.1).copied() else {
            stack.pop();
            on_path[node] = false;
            edges.pop();
            continue;
        };
        frame.1 += 1;

        if on_path[edge.peer] {
            continue;
        }

        let hops = edges.len() + 1;
        if let Some(max_hops) = config.max_hops {
            if hops > max_hops || (edge.peer != target_idx && hops >= max_hops) {
                continue;
            }
        }

        expansions += 1;
        if expansions > config.max_expansions {
            log::warn!("Path search {} => {} stopped after {} expansions with {} candidates.", source, target, config.max_expansions, candidates.len());
            break;
        }

        if edge.peer == target_idx {
            edges.push(edge);
            candidates.push(PathResult::from_edges(topology, source_idx, &edges));
            edges.pop();

            if candidates.len() >= bound {
                break;
            }
            continue;
        }

        edges.push(edge);
        on_path[edge.peer] = true;
        stack.push((edge.peer, 0));
    }

    candidates.sort_by_key(|p| p.total_cost);
    candidates.truncate(limit);

    log::debug!("Paths found {} => {}: {} returned, {} expansions.", source, target, candidates.len(), expansions);

    Ok(candidates)
}

/// Outgoing edges of every node that lead somewhere the target is reachable from,
/// cheapest completion first, ties in adjacency order.
///
/// Parallel links to the same peer collapse to the cheapest one. Path identity is the
/// node sequence, so a second link between the same routers is never a second path.
fn ordered_edges(topology: &NetworkTopology, remaining: &[u64]) -> Vec<Vec<Edge>> {
    let adjacency = topology.adjacency();

    (0..adjacency.node_count())
        .map(|node| {
            let mut edges: Vec<Edge> = adjacency.outgoing(node).iter().filter(|e| remaining[e.peer] != UNREACHABLE).copied().collect();
            edges.sort_by_key(|e| e.cost as u64 + remaining[e.peer]);

            let mut peers = HashSet::with_capacity(edges.len());
            edges.retain(|e| peers.insert(e.peer));
            edges
        })
        .collect()
}
