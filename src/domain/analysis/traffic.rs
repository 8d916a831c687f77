use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::domain::analysis::ANALYTICS_TARGET;
use crate::domain::analysis::batch::{PairError, check_cancelled, run_pairs};
use crate::domain::routing::dijkstra::shortest_path;
use crate::domain::routing::path::PathResult;
use crate::domain::topology::network_topology::NetworkTopology;
use crate::domain::utils::cancellation::CancellationToken;
use crate::domain::utils::id::{GroupId, LinkId, NodeId};
use crate::error::Result;

/// Number of routed pairs crossing one link in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFlow {
    pub link: LinkId,
    pub from: NodeId,
    pub to: NodeId,
    pub routes: usize,
}

/// A router other pairs' best routes pass through.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitHub {
    pub node: NodeId,
    pub group: GroupId,
    pub transit_count: usize,

    /// Fraction of routed pairs that transit this node.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTransit {
    pub group: GroupId,
    pub transit_count: usize,
}

/// Best-path traffic distribution for a set of source/destination pairs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficReport {
    pub pairs_routed: usize,
    pub unreachable_pairs: usize,

    /// Directed link usage, busiest first.
    pub link_flows: Vec<LinkFlow>,

    /// Nodes ranked by how often they are an intermediate hop.
    pub transit_hubs: Vec<TransitHub>,

    /// Transit hops aggregated per group, busiest first.
    pub group_transit: Vec<GroupTransit>,

    pub cancelled: bool,
    pub errors: Vec<PairError>,
}

/// Every ordered pair of distinct nodes in topology order.
pub fn all_node_pairs(topology: &NetworkTopology) -> Vec<(NodeId, NodeId)> {
    let ids: Vec<&NodeId> = topology.nodes().iter().map(|n| &n.id).collect();
    ids.iter().flat_map(|&s| ids.iter().filter(move |&&d| d != s).map(move |&d| (s.clone(), d.clone()))).collect()
}

/// Routes every pair on its best path and counts link and transit usage.
pub fn traffic_flow(topology: &NetworkTopology, pairs: &[(NodeId, NodeId)], config: &AnalysisConfig, cancel: &CancellationToken) -> Result<TrafficReport> {
    let outcome = run_pairs(
        pairs,
        cancel,
        |(s, d): &(NodeId, NodeId)| shortest_path(topology, s, d),
        |(s, d): &(NodeId, NodeId)| (s.to_string(), d.to_string()),
    );
    check_cancelled(outcome.cancelled, outcome.results.len(), pairs.len(), &config.batch)?;

    let routes: Vec<PathResult> = outcome.results.iter().flatten().cloned().collect();
    let unreachable_pairs = outcome.results.len() - routes.len();

    // (link, from, to) -> routes
    let mut flows: BTreeMap<(&LinkId, &NodeId, &NodeId), usize> = BTreeMap::new();
    let mut transit: BTreeMap<&NodeId, usize> = BTreeMap::new();

    for route in &routes {
        for (hop, link) in route.links.iter().enumerate() {
            *flows.entry((link, &route.nodes[hop], &route.nodes[hop + 1])).or_default() += 1;
        }
        for node in route.transit_nodes() {
            *transit.entry(node).or_default() += 1;
        }
    }

    let mut link_flows: Vec<LinkFlow> =
        flows.into_iter().map(|((link, from, to), routes)| LinkFlow { link: link.clone(), from: from.clone(), to: to.clone(), routes }).collect();
    link_flows.sort_by(|a, b| b.routes.cmp(&a.routes));

    let mut group_counts: BTreeMap<GroupId, usize> = BTreeMap::new();
    let mut transit_hubs = Vec::with_capacity(transit.len());

    for (node_id, count) in transit {
        let Some(node) = topology.node(node_id) else {
            continue;
        };
        *group_counts.entry(node.group.clone()).or_default() += count;
        transit_hubs.push(TransitHub {
            node: node_id.clone(),
            group: node.group.clone(),
            transit_count: count,
            share: if routes.is_empty() { 0.0 } else { count as f64 / routes.len() as f64 },
        });
    }
    transit_hubs.sort_by(|a, b| b.transit_count.cmp(&a.transit_count));

    let mut group_transit: Vec<GroupTransit> = group_counts.into_iter().map(|(group, transit_count)| GroupTransit { group, transit_count }).collect();
    group_transit.sort_by(|a, b| b.transit_count.cmp(&a.transit_count));

    tracing::info!(
        target: ANALYTICS_TARGET,
        LogDescription = "Traffic analysis finished",
        PairsRouted = routes.len(),
        UnreachablePairs = unreachable_pairs,
        TransitHubs = transit_hubs.len(),
        Cancelled = outcome.cancelled,
    );

    Ok(TrafficReport {
        pairs_routed: routes.len(),
        unreachable_pairs,
        link_flows,
        transit_hubs,
        group_transit,
        cancelled: outcome.cancelled,
        errors: outcome.errors,
    })
}
