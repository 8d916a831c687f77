use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::domain::analysis::aggregation::{is_sampled, representative_indices};
use crate::domain::analysis::batch::{PairError, check_cancelled, run_pairs};
use crate::domain::routing::dijkstra::shortest_path_tree;
use crate::domain::routing::distance::Distance;
use crate::domain::topology::network_topology::NetworkTopology;
use crate::domain::utils::cancellation::CancellationToken;
use crate::domain::utils::id::{GroupId, NodeId};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostMatrixRow {
    pub source: NodeId,
    pub costs: Vec<Distance>,
}

/// Node-to-node minimum costs. Columns follow `nodes`; rows exist only for sources
/// that were computed before a cancellation. Requested ids the topology does not know
/// are left out of both axes and listed in `errors`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostMatrix {
    pub nodes: Vec<NodeId>,
    pub rows: Vec<CostMatrixRow>,
    pub cancelled: bool,
    pub errors: Vec<PairError>,
}

impl CostMatrix {
    pub fn cost(&self, source: &NodeId, target: &NodeId) -> Option<Distance> {
        let column = self.nodes.iter().position(|n| n == target)?;
        self.rows.iter().find(|row| row.source == *source).map(|row| row.costs[column])
    }
}

/// Cost matrix over `nodes` (every node of the topology when empty).
///
/// Each row is one single-source Dijkstra run, so a full matrix costs V runs rather than
/// V² point queries. Rows are computed in parallel.
pub fn cost_matrix(topology: &NetworkTopology, nodes: &[NodeId], config: &AnalysisConfig, cancel: &CancellationToken) -> Result<CostMatrix> {
    let requested: Vec<NodeId> = if nodes.is_empty() { topology.nodes().iter().map(|n| n.id.clone()).collect() } else { nodes.to_vec() };
    let (nodes, unknown): (Vec<NodeId>, Vec<NodeId>) = requested.into_iter().partition(|id| topology.contains_node(id));

    let mut errors: Vec<PairError> = unknown
        .iter()
        .map(|id| PairError { source: id.to_string(), destination: "*".to_string(), reason: Error::UnknownNodeId(id.to_string()).to_string() })
        .collect();

    let outcome = run_pairs(
        nodes.as_slice(),
        cancel,
        |source: &NodeId| {
            let tree = shortest_path_tree(topology, source)?;
            let costs = nodes.iter().map(|target| tree.distance_to(target)).collect::<Result<Vec<_>>>()?;
            Ok(CostMatrixRow { source: source.clone(), costs })
        },
        |source: &NodeId| (source.to_string(), "*".to_string()),
    );
    check_cancelled(outcome.cancelled, outcome.results.len(), nodes.len(), &config.batch)?;

    if !unknown.is_empty() {
        log::warn!("Cost matrix skips {} unknown nodes.", unknown.len());
    }
    log::info!("Cost matrix computed: {} of {} rows.", outcome.results.len(), nodes.len());

    errors.extend(outcome.errors);

    Ok(CostMatrix { nodes, rows: outcome.results, cancelled: outcome.cancelled, errors })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCostRow {
    pub source: GroupId,
    pub costs: Vec<Distance>,
}

/// Group-to-group minimum costs over representative samples.
///
/// Row `i`, column `j` is the cheapest route from any representative of `groups[i]` to any
/// representative of `groups[j]`. On the diagonal only distinct representatives are
/// paired; a single-member group costs 0 to itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCostMatrix {
    pub groups: Vec<GroupId>,
    pub rows: Vec<GroupCostRow>,
    pub approximate: bool,
    pub cancelled: bool,
    pub errors: Vec<PairError>,
}

impl GroupCostMatrix {
    pub fn cost(&self, source: &GroupId, destination: &GroupId) -> Option<Distance> {
        let column = self.groups.iter().position(|g| g == destination)?;
        self.rows.iter().find(|row| row.source == *source).map(|row| row.costs[column])
    }
}

pub fn group_cost_matrix(topology: &NetworkTopology, config: &AnalysisConfig, cancel: &CancellationToken) -> Result<GroupCostMatrix> {
    let groups: Vec<GroupId> = topology.groups().cloned().collect();

    let mut samples: Vec<Vec<usize>> = Vec::with_capacity(groups.len());
    let mut approximate = false;
    for group in &groups {
        samples.push(representative_indices(topology, group, &config.aggregation)?);
        approximate |= is_sampled(topology, group, &config.aggregation)?;
    }

    let row_indices: Vec<usize> = (0..groups.len()).collect();

    let outcome = run_pairs(
        row_indices.as_slice(),
        cancel,
        |&row: &usize| {
            let mut costs = vec![Distance::Unreachable; groups.len()];

            for &source in &samples[row] {
                let tree = shortest_path_tree(topology, &topology.node_at(source).id)?;

                for (column, members) in samples.iter().enumerate() {
                    for &target in members {
                        if row == column && target == source && members.len() > 1 {
                            continue;
                        }
                        costs[column] = costs[column].min(tree.distance_at(target));
                    }
                }
            }

            Ok(GroupCostRow { source: groups[row].clone(), costs })
        },
        |&row: &usize| (groups[row].to_string(), "*".to_string()),
    );
    check_cancelled(outcome.cancelled, outcome.results.len(), groups.len(), &config.batch)?;

    log::info!("Group cost matrix computed: {} groups{}.", groups.len(), if approximate { ", sampled" } else { "" });

    Ok(GroupCostMatrix { groups, rows: outcome.results, approximate, cancelled: outcome.cancelled, errors: outcome.errors })
}
