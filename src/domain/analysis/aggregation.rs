use serde::Serialize;

use crate::config::{AggregationConfig, AnalysisConfig};
use crate::domain::analysis::batch::{PairError, check_cancelled, run_pairs};
use crate::domain::routing::path::PathResult;
use crate::domain::routing::path_enumerator::find_paths_with;
use crate::domain::topology::network_topology::NetworkTopology;
use crate::domain::utils::cancellation::CancellationToken;
use crate::domain::utils::id::{GroupId, NodeId};
use crate::error::Result;

/// Ranked routes between two groups.
///
/// When `approximate` is set at least one group was larger than the sampling threshold,
/// so only its representatives were searched and the group-wide optimum may be missing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPathReport {
    pub source_group: GroupId,
    pub destination_group: GroupId,
    pub paths: Vec<PathResult>,
    pub source_representatives: Vec<NodeId>,
    pub destination_representatives: Vec<NodeId>,
    pub pairs_evaluated: usize,
    pub approximate: bool,
    pub cancelled: bool,
    pub errors: Vec<PairError>,
}

impl GroupPathReport {
    pub fn best(&self) -> Option<&PathResult> {
        self.paths.first()
    }
}

/// Bounded, deterministic subset of a group's members.
///
/// Groups up to `sample_threshold` members are used whole. Larger groups contribute
/// their `max_representatives` best-connected members: out-degree descending, then id.
pub fn representatives(topology: &NetworkTopology, group: &GroupId, config: &AggregationConfig) -> Result<Vec<NodeId>> {
    Ok(representative_indices(topology, group, config)?.into_iter().map(|idx| topology.node_at(idx).id.clone()).collect())
}

pub(crate) fn representative_indices(topology: &NetworkTopology, group: &GroupId, config: &AggregationConfig) -> Result<Vec<usize>> {
    let mut members = topology.group_member_indices(group)?.to_vec();
    let adjacency = topology.adjacency();

    members.sort_by(|&a, &b| {
        adjacency.out_degree(b).cmp(&adjacency.out_degree(a)).then_with(|| topology.node_at(a).id.cmp(&topology.node_at(b).id))
    });

    if members.len() > config.sample_threshold {
        members.truncate(config.max_representatives.max(1));
    }

    Ok(members)
}

pub(crate) fn is_sampled(topology: &NetworkTopology, group: &GroupId, config: &AggregationConfig) -> Result<bool> {
    Ok(topology.group_member_indices(group)?.len() > config.sample_threshold)
}

/// Representatives chosen for one group pair.
///
/// Sampling ranks members by out-degree, so it depends on the topology it ran on. A
/// what-if comparison samples once on the base topology and searches the same node
/// sets on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSelection {
    pub source_group: GroupId,
    pub destination_group: GroupId,
    pub sources: Vec<NodeId>,
    pub destinations: Vec<NodeId>,
    pub approximate: bool,
}

impl GroupSelection {
    pub fn sample(topology: &NetworkTopology, source_group: &GroupId, destination_group: &GroupId, config: &AggregationConfig) -> Result<Self> {
        Ok(Self {
            source_group: source_group.clone(),
            destination_group: destination_group.clone(),
            sources: representatives(topology, source_group, config)?,
            destinations: representatives(topology, destination_group, config)?,
            approximate: is_sampled(topology, source_group, config)? || is_sampled(topology, destination_group, config)?,
        })
    }

    /// Ordered representative pairs, skipping a node paired with itself.
    pub fn node_pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.sources
            .iter()
            .flat_map(|s| self.destinations.iter().filter(move |d| *d != s).map(move |d| (s.clone(), d.clone())))
            .collect()
    }
}

/// Group-to-group path search over representative node pairs.
///
/// Each representative pair gets at most `per_pair_limit` paths so no single pair can
/// crowd out the others. All per-pair results are merged, stably sorted by cost (pair
/// order breaks ties) and truncated to `overall_limit`.
///
/// This is an approximation for large groups: only representatives are searched. A pair
/// that fails is reported in `errors` and the remaining pairs still run.
pub fn find_group_paths(
    topology: &NetworkTopology,
    source_group: &GroupId,
    destination_group: &GroupId,
    per_pair_limit: usize,
    overall_limit: usize,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> Result<GroupPathReport> {
    let selection = GroupSelection::sample(topology, source_group, destination_group, &config.aggregation)?;
    find_group_paths_for(topology, &selection, per_pair_limit, overall_limit, config, cancel)
}

/// [`find_group_paths`] over an existing selection instead of sampling `topology`.
pub fn find_group_paths_for(
    topology: &NetworkTopology,
    selection: &GroupSelection,
    per_pair_limit: usize,
    overall_limit: usize,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> Result<GroupPathReport> {
    let pairs = selection.node_pairs();

    let outcome = run_pairs(
        pairs.as_slice(),
        cancel,
        |(s, d): &(NodeId, NodeId)| find_paths_with(topology, s, d, per_pair_limit, &config.enumeration),
        |(s, d): &(NodeId, NodeId)| (s.to_string(), d.to_string()),
    );
    check_cancelled(outcome.cancelled, outcome.results.len(), pairs.len(), &config.batch)?;

    let pairs_evaluated = outcome.results.len();
    let mut paths: Vec<PathResult> = outcome.results.into_iter().flatten().collect();
    paths.sort_by_key(|p| p.total_cost);
    paths.truncate(overall_limit);

    log::debug!(
        "Group paths {} => {}: {} pairs evaluated, {} paths kept{}.",
        selection.source_group,
        selection.destination_group,
        pairs_evaluated,
        paths.len(),
        if selection.approximate { " (sampled)" } else { "" }
    );

    Ok(GroupPathReport {
        source_group: selection.source_group.clone(),
        destination_group: selection.destination_group.clone(),
        paths,
        source_representatives: selection.sources.clone(),
        destination_representatives: selection.destinations.clone(),
        pairs_evaluated,
        approximate: selection.approximate,
        cancelled: outcome.cancelled,
        errors: outcome.errors,
    })
}
