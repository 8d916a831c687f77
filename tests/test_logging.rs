mod common;

use common::*;
use ospf_path_analysis::config::AnalysisConfig;
use ospf_path_analysis::domain::analysis::impact::{QueryScope, diff_impact};
use ospf_path_analysis::domain::analysis::traffic::{all_node_pairs, traffic_flow};
use ospf_path_analysis::domain::simulation::overrides::{LinkOverride, OverrideSet, apply_overrides};
use ospf_path_analysis::domain::utils::cancellation::CancellationToken;
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_impact_emits_analytics_event() {
    let base = chain_abc();
    let overridden = apply_overrides(&base, &OverrideSet::from([(link_id("B--To--C"), LinkOverride::down())])).unwrap();

    let scope = QueryScope::NodePairs(vec![(node_id("A"), node_id("C"))]);
    diff_impact(&base, &overridden, &scope, &AnalysisConfig::default(), &CancellationToken::new()).unwrap();

    assert!(logs_contain("Impact analysis finished"));
    assert!(logs_contain("PairsInScope=1"));
    assert!(logs_contain("PairsEvaluated=1"));
    assert!(logs_contain("Broken=1"));
}

#[traced_test]
#[test]
fn test_traffic_emits_analytics_event() {
    let topology = chain_abc();
    let pairs = all_node_pairs(&topology);
    traffic_flow(&topology, &pairs, &AnalysisConfig::default(), &CancellationToken::new()).unwrap();

    assert!(logs_contain("Traffic analysis finished"));
    assert!(logs_contain("PairsRouted=6"));
}
