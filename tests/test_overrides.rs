mod common;

use common::*;
use ospf_path_analysis::api::override_dto::OverridesDto;
use ospf_path_analysis::config::IngestionConfig;
use ospf_path_analysis::domain::routing::dijkstra::shortest_cost;
use ospf_path_analysis::domain::routing::distance::Distance;
use ospf_path_analysis::domain::simulation::overrides::{LinkOverride, OverrideSet, Scenario, apply_overrides, node_failure_overrides};
use ospf_path_analysis::domain::topology::link::LinkStatus;
use ospf_path_analysis::error::Error;

#[test]
fn test_empty_overrides_keep_adjacency() {
    let base = two_routes();
    let derived = apply_overrides(&base, &OverrideSet::new()).unwrap();

    assert_eq!(derived.adjacency(), base.adjacency());
    assert_eq!(derived.links(), base.links());
    assert!(derived.overridden_links().is_empty());
}

#[test]
fn test_link_down_breaks_route_without_touching_base() {
    let base = chain_abc();
    let overrides = OverrideSet::from([(link_id("B--To--C"), LinkOverride::down())]);

    let derived = apply_overrides(&base, &overrides).unwrap();

    assert_eq!(shortest_cost(&derived, &node_id("A"), &node_id("C")).unwrap(), Distance::Unreachable);
    assert_eq!(shortest_cost(&base, &node_id("A"), &node_id("C")).unwrap(), Distance::Finite(10));

    let link = derived.link(&link_id("B--To--C")).unwrap();
    assert_eq!(link.status, LinkStatus::Down);
    assert_eq!(link.original_status, Some(LinkStatus::Up));
    assert!(base.link(&link_id("B--To--C")).unwrap().original_status.is_none());
}

#[test]
fn test_cost_override_records_original_value() {
    let base = two_routes();
    let overrides = OverrideSet::from([(link_id("A--To--B"), LinkOverride::forward_cost(50))]);

    let derived = apply_overrides(&base, &overrides).unwrap();
    let link = derived.link(&link_id("A--To--B")).unwrap();

    assert_eq!(link.forward_cost, 50);
    assert_eq!(link.reverse_cost, 1);
    assert_eq!(link.original_forward_cost, Some(1));
    assert_eq!(link.original_reverse_cost, None);

    // A -> D now prefers the route through C; D -> A still uses the untouched reverse cost.
    assert_eq!(shortest_cost(&derived, &node_id("A"), &node_id("D")).unwrap(), Distance::Finite(20));
    assert_eq!(shortest_cost(&derived, &node_id("D"), &node_id("A")).unwrap(), Distance::Finite(2));
}

#[test]
fn test_stacked_overrides_keep_first_original() {
    let base = two_routes();
    let once = apply_overrides(&base, &OverrideSet::from([(link_id("A--To--B"), LinkOverride::cost(7))])).unwrap();
    let twice = apply_overrides(&once, &OverrideSet::from([(link_id("A--To--B"), LinkOverride::cost(9))])).unwrap();

    let link = twice.link(&link_id("A--To--B")).unwrap();
    assert_eq!(link.forward_cost, 9);
    assert_eq!(link.original_forward_cost, Some(1));

    let restored = twice.restore_originals().unwrap();
    assert_eq!(restored.links(), base.links());
    assert_eq!(restored.adjacency(), base.adjacency());
}

#[test]
fn test_override_back_to_original_restores_costs() {
    let base = two_routes();
    let changed = apply_overrides(&base, &OverrideSet::from([(link_id("B--To--D"), LinkOverride::forward_cost(30))])).unwrap();

    let original = changed.link(&link_id("B--To--D")).unwrap().original_forward_cost.unwrap();
    let back = apply_overrides(&changed, &OverrideSet::from([(link_id("B--To--D"), LinkOverride::forward_cost(original))])).unwrap();

    for source in ["A", "B", "C", "D"] {
        for target in ["A", "B", "C", "D"] {
            assert_eq!(
                shortest_cost(&back, &node_id(source), &node_id(target)).unwrap(),
                shortest_cost(&base, &node_id(source), &node_id(target)).unwrap(),
                "{} -> {}",
                source,
                target
            );
        }
    }
    assert!(back.overridden_links().is_empty());
}

#[test]
fn test_unknown_link_is_rejected() {
    let base = chain_abc();
    let result = apply_overrides(&base, &OverrideSet::from([(link_id("A--To--C"), LinkOverride::down())]));
    assert!(matches!(result, Err(Error::UnknownLinkId(id)) if id == "A--To--C"));
}

#[test]
fn test_out_of_range_override_is_rejected() {
    let base = chain_abc();
    let result = apply_overrides(&base, &OverrideSet::from([(link_id("A--To--B"), LinkOverride::cost(0))]));
    assert!(matches!(result, Err(Error::InvalidCost { cost: 0, .. })));
}

#[test]
fn test_node_failure_downs_every_attached_link() {
    let base = chain_abc();
    let overrides = node_failure_overrides(&base, &node_id("B")).unwrap();
    assert_eq!(overrides.len(), 2);

    let derived = apply_overrides(&base, &overrides).unwrap();
    assert!(derived.neighbors(&node_id("B")).unwrap().is_empty());
    assert_eq!(derived.overridden_links().len(), 2);
}

#[test]
fn test_scenario_from_dto() {
    let base = transit_via_ch();
    let json = r#"{
        "name": "ch maintenance",
        "overrides": { "de1--To--at1": { "cost": 1 } },
        "failedNodes": ["ch1"]
    }"#;
    let dto: OverridesDto = serde_json::from_str(json).unwrap();

    let scenario = Scenario::try_from((dto, &base, &IngestionConfig::default())).unwrap();
    assert_eq!(scenario.name, "ch maintenance");
    assert_eq!(scenario.overrides.len(), 3);
    assert_eq!(scenario.overrides[&link_id("de1--To--ch1")], LinkOverride::down());

    let derived = scenario.apply(&base).unwrap();
    assert_eq!(shortest_cost(&derived, &node_id("de1"), &node_id("fr1")).unwrap(), Distance::Finite(6));
}
