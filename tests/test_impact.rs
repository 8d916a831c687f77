mod common;

use common::*;
use ospf_path_analysis::config::AnalysisConfig;
use ospf_path_analysis::domain::analysis::aggregation::representatives;
use ospf_path_analysis::domain::analysis::impact::{QueryScope, Severity, analyze_scenario, diff_impact};
use ospf_path_analysis::domain::routing::distance::Distance;
use ospf_path_analysis::domain::simulation::overrides::{LinkOverride, OverrideSet, Scenario, apply_overrides};
use ospf_path_analysis::domain::topology::link::Link;
use ospf_path_analysis::domain::topology::network_topology::NetworkTopology;
use ospf_path_analysis::domain::utils::cancellation::CancellationToken;

fn node_pairs(pairs: &[(&str, &str)]) -> QueryScope {
    QueryScope::NodePairs(pairs.iter().map(|(s, d)| (node_id(s), node_id(d))).collect())
}

#[test]
fn test_down_link_is_broken() {
    let base = chain_abc();
    let overridden = apply_overrides(&base, &OverrideSet::from([(link_id("B--To--C"), LinkOverride::down())])).unwrap();

    let report = diff_impact(&base, &overridden, &node_pairs(&[("A", "C")]), &AnalysisConfig::default(), &CancellationToken::new()).unwrap();

    assert_eq!(report.changes.len(), 1);
    let change = &report.changes[0];
    assert_eq!(change.severity, Severity::Broken);
    assert_eq!(change.before_cost, Distance::Finite(10));
    assert_eq!(change.after_cost, Distance::Unreachable);
    assert_eq!(change.cost_delta, None);
    assert!(change.after_path.is_none());
    assert_eq!(report.summary.broken, 1);
    assert!(report.risk_score > 0.0 && report.risk_score <= 100.0);
}

#[test]
fn test_all_group_pairs() {
    let base = chain_abc();
    let overridden = apply_overrides(&base, &OverrideSet::from([(link_id("B--To--C"), LinkOverride::down())])).unwrap();

    let report = diff_impact(&base, &overridden, &QueryScope::AllGroupPairs, &AnalysisConfig::default(), &CancellationToken::new()).unwrap();

    // X and Y can still reach each other; everything involving Z is cut off.
    assert_eq!(report.summary.pairs_in_scope, 6);
    assert_eq!(report.summary.pairs_evaluated, 6);
    assert_eq!(report.summary.pairs_affected, 4);
    assert_eq!(report.summary.broken, 4);
    assert!(report.changes.iter().all(|c| c.source == "Z" || c.destination == "Z"));
}

#[test]
fn test_reroute_through_new_transit_group() {
    let base = transit_via_ch();
    let overridden = apply_overrides(&base, &OverrideSet::from([(link_id("ch1--To--fr1"), LinkOverride::down())])).unwrap();

    let report = diff_impact(&base, &overridden, &node_pairs(&[("de1", "fr1")]), &AnalysisConfig::default(), &CancellationToken::new()).unwrap();

    let change = &report.changes[0];
    // 4 -> 10 is +150%.
    assert_eq!(change.severity, Severity::Major);
    assert_eq!(change.cost_delta, Some(6));
    assert_eq!(change.added_transit_groups, vec![group_id("AT")]);
    assert_eq!(change.removed_transit_groups, vec![group_id("CH")]);
    assert_eq!(change.after_path.as_ref().unwrap().id.as_str(), "de1->at1->fr1");
}

#[test]
fn test_severity_ordering_in_report() {
    let base = two_regions();
    let overrides = OverrideSet::from([
        // de1 -> fr1 goes from 3 to 4.
        (link_id("de1--To--fr1"), LinkOverride::forward_cost(4)),
        // fr2 -> de2 goes from 5 (via fr1 and de1) to 1.
        (link_id("de2--To--fr2"), LinkOverride::reverse_cost(1)),
    ]);
    let overridden = apply_overrides(&base, &overrides).unwrap();

    let scope = node_pairs(&[("fr2", "de2"), ("de1", "fr1"), ("fr1", "fr2")]);
    let report = diff_impact(&base, &overridden, &scope, &AnalysisConfig::default(), &CancellationToken::new()).unwrap();

    let severities: Vec<Severity> = report.changes.iter().map(|c| c.severity).collect();
    assert_eq!(severities, vec![Severity::Minor, Severity::Improved]);
    assert_eq!(report.summary.pairs_evaluated, 3);
    assert_eq!(report.summary.minor, 1);
    assert_eq!(report.summary.improved, 1);
}

#[test]
fn test_no_change_scores_zero() {
    let base = two_regions();
    let overridden = apply_overrides(&base, &OverrideSet::new()).unwrap();

    let report = diff_impact(&base, &overridden, &QueryScope::AllGroupPairs, &AnalysisConfig::default(), &CancellationToken::new()).unwrap();

    assert!(report.changes.is_empty());
    assert_eq!(report.risk_score, 0.0);
}

#[test]
fn test_risk_score_ranks_scenarios() {
    let base = transit_via_ch();
    let config = AnalysisConfig::default();
    let scope = QueryScope::AllGroupPairs;

    let mild = Scenario::new("mild", OverrideSet::from([(link_id("de1--To--ch1"), LinkOverride::cost(3))]));
    let severe = Scenario::new(
        "severe",
        OverrideSet::from([(link_id("de1--To--ch1"), LinkOverride::down()), (link_id("de1--To--at1"), LinkOverride::down())]),
    );

    let (_, mild_report) = analyze_scenario(&base, &mild, &scope, &config, &CancellationToken::new()).unwrap();
    let (severe_topology, severe_report) = analyze_scenario(&base, &severe, &scope, &config, &CancellationToken::new()).unwrap();

    assert!(severe_report.summary.broken > 0);
    assert_eq!(mild_report.summary.broken, 0);
    assert!(severe_report.risk_score > mild_report.risk_score);
    assert_eq!(severe_topology.overridden_links().len(), 2);
}

#[test]
fn test_cancelled_diff_returns_partial_report() {
    let base = chain_abc();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = diff_impact(&base, &base, &QueryScope::AllGroupPairs, &AnalysisConfig::default(), &cancel).unwrap();
    assert!(report.cancelled);
    assert_eq!(report.summary.pairs_evaluated, 0);
    // Three groups, six ordered pairs, none of them started.
    assert_eq!(report.summary.pairs_in_scope, 6);
}

#[test]
fn test_switch_to_parallel_link_is_minor() {
    let base = build(&[("A", "X"), ("B", "Y")], vec![Link::new("L1", "A", "B", 5), Link::new("L2", "A", "B", 5)]);
    let overridden = apply_overrides(&base, &OverrideSet::from([(link_id("L1"), LinkOverride::down())])).unwrap();

    let report = diff_impact(&base, &overridden, &node_pairs(&[("A", "B")]), &AnalysisConfig::default(), &CancellationToken::new()).unwrap();

    assert_eq!(report.changes.len(), 1);
    let change = &report.changes[0];
    assert_eq!(change.severity, Severity::Minor);
    assert_eq!(change.cost_delta, Some(0));
    assert_eq!(change.before_path.as_ref().unwrap().links, vec![link_id("L1")]);
    assert_eq!(change.after_path.as_ref().unwrap().links, vec![link_id("L2")]);
}

/// Group A has five members, so it is sampled down to four. a5 is the best connected
/// member and the only cheap way into B.
fn sampled_group() -> NetworkTopology {
    let mut links = vec![link("a5", "b1", 1)];
    links.extend(["a1", "a2", "a3", "a4"].iter().map(|a| link(a, "b1", 50)));
    links.extend(["a1", "a2", "a3"].iter().map(|a| link("a5", a, 10)));

    build(&[("a1", "A"), ("a2", "A"), ("a3", "A"), ("a4", "A"), ("a5", "A"), ("b1", "B")], links)
}

#[test]
fn test_group_diff_keeps_base_representatives() {
    let base = sampled_group();
    let config = AnalysisConfig::default();
    // None of these links carry the a5 <-> b1 route, but they cost a5 its degree.
    let overrides: OverrideSet = ["a5--To--a1", "a5--To--a2", "a5--To--a3"].iter().map(|id| (link_id(id), LinkOverride::down())).collect();
    let overridden = apply_overrides(&base, &overrides).unwrap();

    assert!(representatives(&base, &group_id("A"), &config.aggregation).unwrap().contains(&node_id("a5")));
    assert!(!representatives(&overridden, &group_id("A"), &config.aggregation).unwrap().contains(&node_id("a5")));

    let report = diff_impact(&base, &overridden, &QueryScope::AllGroupPairs, &config, &CancellationToken::new()).unwrap();

    assert_eq!(report.summary.pairs_evaluated, 2);
    assert!(report.changes.is_empty(), "unexpected changes: {:?}", report.changes);
    assert_eq!(report.risk_score, 0.0);
}
