use std::collections::{BTreeMap, HashMap, HashSet};

use crate::api::topology_dto::TopologyDto;
use crate::config::{IngestionConfig, MAX_COST, MIN_COST};
use crate::domain::topology::adjacency::AdjacencyView;
use crate::domain::topology::link::{Link, LinkStatus, normalize_cost};
use crate::domain::topology::node::Node;
use crate::domain::utils::id::{GroupId, LinkId, NodeId};
use crate::error::{Error, Result};

/// An immutable snapshot of the analysed network.
///
/// The snapshot owns:
/// * **Nodes**: routers in ingestion order, indexed by id.
/// * **Links**: physical links with per-direction costs and status.
/// * **Groups**: region membership used by group-to-group queries.
/// * **Adjacency**: the derived directed view every algorithm traverses.
///
/// There is no mutation API. The override layer derives a new snapshot instead, so a
/// caller can hold the base and the what-if topology side by side.
#[derive(Debug, Clone)]
pub struct NetworkTopology {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    links: Vec<Link>,
    link_index: HashMap<LinkId, usize>,
    groups: BTreeMap<GroupId, Vec<usize>>,
    adjacency: AdjacencyView,
}

impl TryFrom<(TopologyDto, &IngestionConfig)> for NetworkTopology {
    type Error = Error;

    fn try_from(args: (TopologyDto, &IngestionConfig)) -> Result<Self> {
        let (dto, config) = args;

        let nodes: Vec<Node> = dto
            .nodes
            .into_iter()
            .map(|n| Node { label: n.label, hostname: n.hostname, ..Node::new(n.id, n.group) })
            .collect();

        let mut links = Vec::with_capacity(dto.links.len());
        for link_dto in dto.links {
            let source = link_dto.source.into_id();
            let target = link_dto.target.into_id();
            let id = link_dto.id.unwrap_or_else(|| Link::default_id(&source, &target));

            let forward_cost = normalize_cost(&id, link_dto.forward_cost, config.cost_policy)?;
            let reverse_cost = match link_dto.reverse_cost {
                Some(cost) => normalize_cost(&id, cost, config.cost_policy)?,
                None => forward_cost,
            };
            let status = match link_dto.status {
                Some(status) => status.parse::<LinkStatus>()?,
                None => LinkStatus::Up,
            };

            links.push(Link::new(id, source, target, forward_cost).with_reverse_cost(reverse_cost).with_status(status));
        }

        NetworkTopology::new(nodes, links)
    }
}

impl TryFrom<TopologyDto> for NetworkTopology {
    type Error = Error;

    fn try_from(dto: TopologyDto) -> Result<Self> {
        NetworkTopology::try_from((dto, &IngestionConfig::default()))
    }
}

impl NetworkTopology {
    /// Builds a snapshot from normalized nodes and links.
    ///
    /// Fails without returning anything partial when node or link ids collide, when a
    /// link references a node that does not exist, or when a cost is outside the
    /// OSPF metric range.
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Result<Self> {
        // 1. Index nodes and derive groups.
        let mut node_index: HashMap<NodeId, usize> = HashMap::with_capacity(nodes.len());
        let mut groups: BTreeMap<GroupId, Vec<usize>> = BTreeMap::new();

        for (idx, node) in nodes.iter().enumerate() {
            if node_index.insert(node.id.clone(), idx).is_some() {
                return Err(Error::DuplicateNodeId(node.id.to_string()));
            }
            groups.entry(node.group.clone()).or_default().push(idx);
        }

        // 2. Validate and index links.
        let mut link_index: HashMap<LinkId, usize> = HashMap::with_capacity(links.len());

        for (idx, link) in links.iter().enumerate() {
            if link_index.insert(link.id.clone(), idx).is_some() {
                return Err(Error::DuplicateLinkId(link.id.to_string()));
            }

            for endpoint in [&link.source, &link.target] {
                if !node_index.contains_key(endpoint) {
                    return Err(Error::UnknownNodeId(endpoint.to_string()));
                }
            }

            for cost in [link.forward_cost, link.reverse_cost] {
                if !(MIN_COST..=MAX_COST).contains(&cost) {
                    return Err(Error::InvalidCost { link: link.id.to_string(), cost: cost as i64 });
                }
            }
        }

        // 3. Derive the directed view.
        let adjacency = AdjacencyView::build(nodes.len(), &node_index, &links);

        log::debug!(
            "Topology built: {} nodes, {} links, {} groups, {} directed edges.",
            nodes.len(),
            links.len(),
            groups.len(),
            adjacency.edge_count()
        );

        Ok(Self { nodes, node_index, links, link_index, groups, adjacency })
    }

    /// Same nodes, different link set. This is the only way a modified topology comes
    /// into being, and it always rebuilds the adjacency view from scratch.
    pub(crate) fn with_links(&self, links: Vec<Link>) -> Result<Self> {
        NetworkTopology::new(self.nodes.clone(), links)
    }

    /// A snapshot with every overridden link put back to its original values.
    pub fn restore_originals(&self) -> Result<Self> {
        self.with_links(self.links.iter().map(Link::restored).collect())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.link_index.get(id).map(|&idx| &self.links[idx])
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn adjacency(&self) -> &AdjacencyView {
        &self.adjacency
    }

    pub(crate) fn index_of(&self, id: &NodeId) -> Result<usize> {
        self.node_index.get(id).copied().ok_or_else(|| Error::UnknownNodeId(id.to_string()))
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn link_at(&self, idx: usize) -> &Link {
        &self.links[idx]
    }

    /// Reachable neighbours of `id` with the cost of the hop towards each of them.
    pub fn neighbors(&self, id: &NodeId) -> Result<Vec<(&NodeId, u32)>> {
        let idx = self.index_of(id)?;
        Ok(self.adjacency.outgoing(idx).iter().map(|edge| (&self.nodes[edge.peer].id, edge.cost)).collect())
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.keys()
    }

    pub fn group_members(&self, group: &GroupId) -> Result<Vec<&NodeId>> {
        Ok(self.group_member_indices(group)?.iter().map(|&idx| &self.nodes[idx].id).collect())
    }

    pub(crate) fn group_member_indices(&self, group: &GroupId) -> Result<&[usize]> {
        self.groups.get(group).map(Vec::as_slice).ok_or_else(|| Error::UnknownGroupId(group.to_string()))
    }

    /// Links whose current values differ from the ones they were ingested with.
    pub fn overridden_links(&self) -> Vec<&Link> {
        self.links.iter().filter(|l| l.is_overridden()).collect()
    }

    /// Ids of links that touch `node`, in link order.
    pub fn links_of(&self, node: &NodeId) -> Result<Vec<&LinkId>> {
        self.index_of(node)?;
        Ok(self.links.iter().filter(|l| l.touches(node)).map(|l| &l.id).collect())
    }

    pub(crate) fn distinct_groups_of(&self, nodes: &[NodeId]) -> HashSet<GroupId> {
        nodes.iter().filter_map(|n| self.node(n)).map(|n| n.group.clone()).collect()
    }
}
