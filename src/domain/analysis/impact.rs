use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::config::{AnalysisConfig, ImpactConfig};
use crate::domain::analysis::ANALYTICS_TARGET;
use crate::domain::analysis::aggregation::{GroupSelection, find_group_paths_for};
use crate::domain::analysis::batch::{BatchOutcome, PairError, check_cancelled, run_pairs};
use crate::domain::routing::distance::Distance;
use crate::domain::routing::path::PathResult;
use crate::domain::routing::path_enumerator::find_paths_with;
use crate::domain::simulation::overrides::Scenario;
use crate::domain::topology::network_topology::NetworkTopology;
use crate::domain::utils::cancellation::CancellationToken;
use crate::domain::utils::id::{GroupId, NodeId};
use crate::error::Result;

/// Which routes an impact analysis compares.
#[derive(Debug, Clone)]
pub enum QueryScope {
    NodePairs(Vec<(NodeId, NodeId)>),
    GroupPairs(Vec<(GroupId, GroupId)>),
    /// Every ordered pair of distinct groups in the base topology.
    AllGroupPairs,
}

/// Declared from most to least severe; sorting a report uses this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Broken,
    Major,
    Minor,
    Improved,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteChange {
    pub source: String,
    pub destination: String,
    pub severity: Severity,
    pub before_cost: Distance,
    pub after_cost: Distance,

    /// `after - before` when both are finite.
    pub cost_delta: Option<i64>,

    pub before_path: Option<PathResult>,
    pub after_path: Option<PathResult>,
    pub added_transit_groups: Vec<GroupId>,
    pub removed_transit_groups: Vec<GroupId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    /// Pairs the scope asked for, including any skipped by a cancellation or failed.
    pub pairs_in_scope: usize,
    pub pairs_evaluated: usize,
    pub pairs_affected: usize,
    pub broken: usize,
    pub major: usize,
    pub minor: usize,
    pub improved: usize,
}

/// Route deltas between a base and an overridden topology.
///
/// `risk_score` is a heuristic in `0..=100` for ranking scenarios against each other;
/// it has no physical unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub changes: Vec<RouteChange>,
    pub summary: ImpactSummary,
    pub risk_score: f64,
    pub cancelled: bool,
    pub errors: Vec<PairError>,
}

/// Severity of a route change, or `None` when nothing changed.
///
/// Unreachable orders above every finite cost, so a route that becomes reachable is an
/// improvement. Cost increases are `major` when the increase is strictly above the
/// absolute threshold or strictly above the relative threshold times the old cost. Any
/// other difference, including a new path at the same cost, is `minor`.
pub fn classify(before: Distance, after: Distance, path_changed: bool, config: &ImpactConfig) -> Option<Severity> {
    match (before, after) {
        (Distance::Unreachable, Distance::Unreachable) => None,
        (Distance::Finite(_), Distance::Unreachable) => Some(Severity::Broken),
        (Distance::Unreachable, Distance::Finite(_)) => Some(Severity::Improved),
        (Distance::Finite(b), Distance::Finite(a)) if a < b => Some(Severity::Improved),
        (Distance::Finite(b), Distance::Finite(a)) if a > b => {
            let increase = a - b;
            let relative_exceeded = (increase as f64) > config.major_relative_increase * (b as f64);
            if increase > config.major_absolute_increase || relative_exceeded { Some(Severity::Major) } else { Some(Severity::Minor) }
        }
        _ if path_changed => Some(Severity::Minor),
        _ => None,
    }
}

/// Heuristic network-wide risk in `0..=100`.
///
/// Sums four capped components: the share of evaluated pairs that changed, the mean
/// relative cost change of those pairs (each capped at 100%, broken pairs count as
/// 100%), the number of distinct transit groups gained or lost against
/// `transit_saturation`, and a fixed penalty per broken pair up to `broken_penalty_cap`.
pub fn risk_score(changes: &[RouteChange], pairs_evaluated: usize, config: &ImpactConfig) -> f64 {
    if pairs_evaluated == 0 || changes.is_empty() {
        return 0.0;
    }

    let affected = changes.len() as f64 / pairs_evaluated as f64;

    let magnitude = changes
        .iter()
        .map(|c| match (c.before_cost, c.after_cost) {
            (Distance::Finite(b), Distance::Finite(a)) if b > 0 => (a.abs_diff(b) as f64 / b as f64).min(1.0),
            (Distance::Finite(_), Distance::Finite(_)) => 0.0,
            _ => 1.0,
        })
        .sum::<f64>()
        / changes.len() as f64;

    let transit_groups: HashSet<&GroupId> = changes.iter().flat_map(|c| c.added_transit_groups.iter().chain(&c.removed_transit_groups)).collect();
    let transit = if config.transit_saturation == 0 {
        if transit_groups.is_empty() { 0.0 } else { 1.0 }
    } else {
        (transit_groups.len() as f64 / config.transit_saturation as f64).min(1.0)
    };

    let broken = changes.iter().filter(|c| c.severity == Severity::Broken).count() as f64;
    let broken_penalty = (broken * config.broken_pair_penalty).min(config.broken_penalty_cap);

    let score = affected * config.affected_weight + magnitude * config.magnitude_weight + transit * config.transit_weight + broken_penalty;
    score.clamp(0.0, 100.0)
}

struct RouteSnapshot {
    source: String,
    destination: String,
    before: Option<PathResult>,
    after: Option<PathResult>,
}

fn transit_groups(topology: &NetworkTopology, path: Option<&PathResult>) -> BTreeSet<GroupId> {
    let Some(path) = path else {
        return BTreeSet::new();
    };

    let endpoint_groups: HashSet<GroupId> = topology.distinct_groups_of(&[path.source().clone(), path.target().clone()]);

    path.transit_nodes()
        .iter()
        .filter_map(|n| topology.node(n))
        .map(|n| n.group.clone())
        .filter(|g| !endpoint_groups.contains(g))
        .collect()
}

fn cost_of(path: Option<&PathResult>) -> Distance {
    Distance::from(path.map(|p| p.total_cost))
}

/// Compares best routes for every pair in `scope` under `base` and `overridden`.
///
/// Node pairs use the path enumerator (its first result is the exact shortest path);
/// group pairs use representative-sampled group search, with the representatives drawn
/// from `base` and reused on `overridden`. Only pairs whose cost or path
/// changed appear in `changes`, sorted by severity with input order kept within a
/// severity. A pair that fails on either topology is recorded in `errors` and skipped.
pub fn diff_impact(
    base: &NetworkTopology,
    overridden: &NetworkTopology,
    scope: &QueryScope,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> Result<ImpactReport> {
    let (outcome, scope_size) = match scope {
        QueryScope::NodePairs(pairs) => {
            let outcome = run_pairs(
                pairs.as_slice(),
                cancel,
                |(s, d): &(NodeId, NodeId)| {
                    let best = |t: &NetworkTopology| -> Result<Option<PathResult>> { Ok(find_paths_with(t, s, d, 1, &config.enumeration)?.into_iter().next()) };
                    Ok(RouteSnapshot { source: s.to_string(), destination: d.to_string(), before: best(base)?, after: best(overridden)? })
                },
                |(s, d): &(NodeId, NodeId)| (s.to_string(), d.to_string()),
            );
            (outcome, pairs.len())
        }
        QueryScope::GroupPairs(pairs) => (run_group_pairs(base, overridden, pairs, config, cancel), pairs.len()),
        QueryScope::AllGroupPairs => {
            let groups: Vec<GroupId> = base.groups().cloned().collect();
            let pairs: Vec<(GroupId, GroupId)> =
                groups.iter().flat_map(|s| groups.iter().filter(move |d| *d != s).map(move |d| (s.clone(), d.clone()))).collect();
            (run_group_pairs(base, overridden, &pairs, config, cancel), pairs.len())
        }
    };

    check_cancelled(outcome.cancelled, outcome.results.len(), scope_size, &config.batch)?;

    let pairs_evaluated = outcome.results.len();
    let mut changes = Vec::new();

    for snapshot in outcome.results {
        let before_cost = cost_of(snapshot.before.as_ref());
        let after_cost = cost_of(snapshot.after.as_ref());
        // Same routers over a different parallel link still counts as a new path.
        let path_changed = snapshot.before.as_ref().map(|p| (&p.id, &p.links)) != snapshot.after.as_ref().map(|p| (&p.id, &p.links));

        let Some(severity) = classify(before_cost, after_cost, path_changed, &config.impact) else {
            continue;
        };

        let before_groups = transit_groups(base, snapshot.before.as_ref());
        let after_groups = transit_groups(overridden, snapshot.after.as_ref());

        changes.push(RouteChange {
            source: snapshot.source,
            destination: snapshot.destination,
            severity,
            before_cost,
            after_cost,
            cost_delta: match (before_cost, after_cost) {
                (Distance::Finite(b), Distance::Finite(a)) => Some(a as i64 - b as i64),
                _ => None,
            },
            added_transit_groups: after_groups.difference(&before_groups).cloned().collect(),
            removed_transit_groups: before_groups.difference(&after_groups).cloned().collect(),
            before_path: snapshot.before,
            after_path: snapshot.after,
        });
    }

    changes.sort_by_key(|c| c.severity);

    let count = |s: Severity| changes.iter().filter(|c| c.severity == s).count();
    let summary = ImpactSummary {
        pairs_in_scope: scope_size,
        pairs_evaluated,
        pairs_affected: changes.len(),
        broken: count(Severity::Broken),
        major: count(Severity::Major),
        minor: count(Severity::Minor),
        improved: count(Severity::Improved),
    };
    let risk_score = risk_score(&changes, pairs_evaluated, &config.impact);

    tracing::info!(
        target: ANALYTICS_TARGET,
        LogDescription = "Impact analysis finished",
        PairsInScope = summary.pairs_in_scope,
        PairsEvaluated = summary.pairs_evaluated,
        PairsAffected = summary.pairs_affected,
        Broken = summary.broken,
        Major = summary.major,
        Minor = summary.minor,
        Improved = summary.improved,
        RiskScore = risk_score,
        Cancelled = outcome.cancelled,
    );

    Ok(ImpactReport { changes, summary, risk_score, cancelled: outcome.cancelled, errors: outcome.errors })
}

fn run_group_pairs(
    base: &NetworkTopology,
    overridden: &NetworkTopology,
    pairs: &[(GroupId, GroupId)],
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> BatchOutcome<RouteSnapshot> {
    let per_pair_limit = config.aggregation.per_pair_limit;

    run_pairs(
        pairs,
        cancel,
        |(s, d): &(GroupId, GroupId)| {
            let selection = GroupSelection::sample(base, s, d, &config.aggregation)?;

            // The outer loop owns cancellation; each group search runs to completion.
            let best = |t: &NetworkTopology| -> Result<Option<PathResult>> {
                Ok(find_group_paths_for(t, &selection, per_pair_limit, 1, config, &CancellationToken::new())?.paths.into_iter().next())
            };
            Ok(RouteSnapshot { source: s.to_string(), destination: d.to_string(), before: best(base)?, after: best(overridden)? })
        },
        |(s, d): &(GroupId, GroupId)| (s.to_string(), d.to_string()),
    )
}

/// Applies `scenario` to `base` and diffs the result. Returns the derived topology
/// alongside the report so callers can keep analysing it.
pub fn analyze_scenario(
    base: &NetworkTopology,
    scenario: &Scenario,
    scope: &QueryScope,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> Result<(NetworkTopology, ImpactReport)> {
    let overridden = scenario.apply(base)?;
    let report = diff_impact(base, &overridden, scope, config, cancel)?;

    log::info!(
        "Scenario '{}': {} of {} pairs affected, risk score {:.1}.",
        scenario.name,
        report.summary.pairs_affected,
        report.summary.pairs_evaluated,
        report.risk_score
    );

    Ok((overridden, report))
}
