use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::override_dto::OverridesDto;
use crate::config::IngestionConfig;
use crate::domain::topology::link::{Link, LinkStatus, normalize_cost};
use crate::domain::topology::network_topology::NetworkTopology;
use crate::domain::utils::id::{LinkId, NodeId};
use crate::error::{Error, Result};

/// Sparse change to one link. Unset fields keep the base link's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOverride {
    pub forward_cost: Option<u32>,
    pub reverse_cost: Option<u32>,
    pub status: Option<LinkStatus>,
}

impl LinkOverride {
    pub fn forward_cost(cost: u32) -> Self {
        Self { forward_cost: Some(cost), ..Default::default() }
    }

    pub fn reverse_cost(cost: u32) -> Self {
        Self { reverse_cost: Some(cost), ..Default::default() }
    }

    /// Same cost in both directions.
    pub fn cost(cost: u32) -> Self {
        Self { forward_cost: Some(cost), reverse_cost: Some(cost), status: None }
    }

    pub fn status(status: LinkStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn down() -> Self {
        Self::status(LinkStatus::Down)
    }

    pub fn is_empty(&self) -> bool {
        self.forward_cost.is_none() && self.reverse_cost.is_none() && self.status.is_none()
    }

    /// Fields set in `other` win.
    pub fn merged_with(self, other: LinkOverride) -> Self {
        Self {
            forward_cost: other.forward_cost.or(self.forward_cost),
            reverse_cost: other.reverse_cost.or(self.reverse_cost),
            status: other.status.or(self.status),
        }
    }

    fn apply_to(&self, link: &Link) -> Link {
        let mut derived = link.clone();

        if let Some(cost) = self.forward_cost {
            derived.original_forward_cost.get_or_insert(link.forward_cost);
            derived.forward_cost = cost;
        }
        if let Some(cost) = self.reverse_cost {
            derived.original_reverse_cost.get_or_insert(link.reverse_cost);
            derived.reverse_cost = cost;
        }
        if let Some(status) = self.status {
            derived.original_status.get_or_insert(link.status);
            derived.status = status;
        }

        derived
    }
}

pub type OverrideSet = BTreeMap<LinkId, LinkOverride>;

/// Derives a new topology snapshot from `base` with `overrides` applied.
///
/// `base` is only read. Every link is copied by value into the new snapshot, changed
/// fields remember their previous value in `original_*`, and the adjacency view is
/// rebuilt from the new link set. Overridden costs go through the same range check as
/// ingestion. Fails with `Error::UnknownLinkId` if an override names a link the base
/// does not have.
pub fn apply_overrides(base: &NetworkTopology, overrides: &OverrideSet) -> Result<NetworkTopology> {
    if let Some(unknown) = overrides.keys().find(|id| base.link(id).is_none()) {
        return Err(Error::UnknownLinkId(unknown.to_string()));
    }

    let links: Vec<Link> = base
        .links()
        .iter()
        .map(|link| match overrides.get(&link.id) {
            Some(link_override) => link_override.apply_to(link),
            None => link.clone(),
        })
        .collect();

    let derived = base.with_links(links)?;

    log::info!("Applied {} link overrides; {} links now differ from their original values.", overrides.len(), derived.overridden_links().len());

    Ok(derived)
}

/// Overrides that take `node` out of service by downing every link that touches it.
pub fn node_failure_overrides(topology: &NetworkTopology, node: &NodeId) -> Result<OverrideSet> {
    Ok(topology.links_of(node)?.into_iter().map(|id| (id.clone(), LinkOverride::down())).collect())
}

/// A named what-if scenario: the override set a simulation run applies to a base topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    pub overrides: OverrideSet,
}

impl TryFrom<(OverridesDto, &NetworkTopology, &IngestionConfig)> for Scenario {
    type Error = Error;

    fn try_from(args: (OverridesDto, &NetworkTopology, &IngestionConfig)) -> Result<Self> {
        let (dto, topology, config) = args;
        let mut overrides = OverrideSet::new();

        for (link_id, link_dto) in dto.overrides {
            let link_override = LinkOverride {
                forward_cost: link_dto.forward_cost.map(|c| normalize_cost(&link_id, c, config.cost_policy)).transpose()?,
                reverse_cost: link_dto.reverse_cost.map(|c| normalize_cost(&link_id, c, config.cost_policy)).transpose()?,
                status: link_dto.status.map(|s| s.parse::<LinkStatus>()).transpose()?,
            };
            overrides.insert(LinkId::new(link_id), link_override);
        }

        for node in dto.failed_nodes {
            for (link_id, down) in node_failure_overrides(topology, &NodeId::new(node))? {
                let merged = overrides.get(&link_id).copied().unwrap_or_default().merged_with(down);
                overrides.insert(link_id, merged);
            }
        }

        Ok(Scenario { name: dto.name.unwrap_or_else(|| "unnamed scenario".to_string()), overrides })
    }
}

impl Scenario {
    pub fn new(name: impl Into<String>, overrides: OverrideSet) -> Self {
        Self { name: name.into(), overrides }
    }

    pub fn apply(&self, base: &NetworkTopology) -> Result<NetworkTopology> {
        log::debug!("Applying scenario '{}'.", self.name);
        apply_overrides(base, &self.overrides)
    }
}
