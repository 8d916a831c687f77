#![allow(dead_code)]

use ospf_path_analysis::domain::topology::link::Link;
use ospf_path_analysis::domain::topology::network_topology::NetworkTopology;
use ospf_path_analysis::domain::topology::node::Node;
use ospf_path_analysis::domain::utils::id::{GroupId, LinkId, NodeId};

pub fn node_id(id: &str) -> NodeId {
    NodeId::new(id)
}

pub fn link_id(id: &str) -> LinkId {
    LinkId::new(id)
}

pub fn group_id(id: &str) -> GroupId {
    GroupId::new(id)
}

/// Symmetric link with the `source--To--target` id.
pub fn link(source: &str, target: &str, cost: u32) -> Link {
    Link::new(Link::default_id(source, target), source, target, cost)
}

/// Builds a topology from `(id, group)` nodes and prepared links.
pub fn build(nodes: &[(&str, &str)], links: Vec<Link>) -> NetworkTopology {
    let nodes = nodes.iter().map(|(id, group)| Node::new(*id, *group)).collect();
    NetworkTopology::new(nodes, links).expect("test topology should be valid")
}

/// A -5- B -5- C, no direct A-C link.
pub fn chain_abc() -> NetworkTopology {
    build(&[("A", "X"), ("B", "Y"), ("C", "Z")], vec![link("A", "B", 5), link("B", "C", 5)])
}

/// Two 2-hop routes from A to D: via B (cost 2) and via C (cost 20).
pub fn two_routes() -> NetworkTopology {
    build(
        &[("A", "G1"), ("B", "G2"), ("C", "G3"), ("D", "G4")],
        vec![link("A", "B", 1), link("B", "D", 1), link("A", "C", 10), link("C", "D", 10)],
    )
}

/// Two regions joined by a cheap and an expensive inter-region link.
///
/// ```text
/// DE: de1 - de2        FR: fr1 - fr2
///      de1 -3- fr1  (primary)
///      de2 -7- fr2  (backup)
/// ```
pub fn two_regions() -> NetworkTopology {
    build(
        &[("de1", "DE"), ("de2", "DE"), ("fr1", "FR"), ("fr2", "FR")],
        vec![link("de1", "de2", 1), link("fr1", "fr2", 1), link("de1", "fr1", 3), link("de2", "fr2", 7)],
    )
}

/// DE and FR only reachable through a transit router in CH.
pub fn transit_via_ch() -> NetworkTopology {
    build(
        &[("de1", "DE"), ("ch1", "CH"), ("fr1", "FR"), ("at1", "AT")],
        vec![link("de1", "ch1", 2), link("ch1", "fr1", 2), link("de1", "at1", 5), link("at1", "fr1", 5)],
    )
}
