use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{CostPolicy, MAX_COST, MIN_COST};
use crate::domain::utils::id::{LinkId, NodeId};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    #[default]
    Up,
    Down,
}

impl FromStr for LinkStatus {
    type Err = Error;

    fn from_str(status: &str) -> Result<LinkStatus> {
        match status.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(LinkStatus::Up),
            "down" => Ok(LinkStatus::Down),
            _ => Err(Error::InvalidStatus(status.to_string())),
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Up => write!(f, "up"),
            LinkStatus::Down => write!(f, "down"),
        }
    }
}

/// A physical link between two routers.
///
/// The link is stored with a direction (`source` -> `target`) but is traversable both
/// ways, each direction with its own cost. A `Down` link offers no edge at all.
///
/// The `original_*` fields are only set on links derived by the override layer and hold
/// the value the link had before its first override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: LinkId,
    pub source: NodeId,
    pub target: NodeId,

    /// Cost of traversing `source` -> `target`.
    pub forward_cost: u32,

    /// Cost of traversing `target` -> `source`.
    pub reverse_cost: u32,

    pub status: LinkStatus,

    pub original_forward_cost: Option<u32>,
    pub original_reverse_cost: Option<u32>,
    pub original_status: Option<LinkStatus>,
}

impl Link {
    /// Creates a symmetric, operational link.
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>, cost: u32) -> Self {
        Self {
            id: LinkId::new(id),
            source: NodeId::new(source),
            target: NodeId::new(target),
            forward_cost: cost,
            reverse_cost: cost,
            status: LinkStatus::Up,
            original_forward_cost: None,
            original_reverse_cost: None,
            original_status: None,
        }
    }

    pub fn with_reverse_cost(mut self, reverse_cost: u32) -> Self {
        self.reverse_cost = reverse_cost;
        self
    }

    pub fn with_status(mut self, status: LinkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == LinkStatus::Up
    }

    pub fn is_symmetric(&self) -> bool {
        self.forward_cost == self.reverse_cost
    }

    /// Cost of leaving `from` over this link, or `None` if `from` is not an endpoint.
    pub fn cost_from(&self, from: &NodeId) -> Option<u32> {
        if *from == self.source {
            Some(self.forward_cost)
        } else if *from == self.target {
            Some(self.reverse_cost)
        } else {
            None
        }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        self.source == *node || self.target == *node
    }

    pub fn is_overridden(&self) -> bool {
        self.original_forward_cost.is_some_and(|c| c != self.forward_cost)
            || self.original_reverse_cost.is_some_and(|c| c != self.reverse_cost)
            || self.original_status.is_some_and(|s| s != self.status)
    }

    /// The link as it was before any override was applied.
    pub fn restored(&self) -> Link {
        Link {
            forward_cost: self.original_forward_cost.unwrap_or(self.forward_cost),
            reverse_cost: self.original_reverse_cost.unwrap_or(self.reverse_cost),
            status: self.original_status.unwrap_or(self.status),
            original_forward_cost: None,
            original_reverse_cost: None,
            original_status: None,
            ..self.clone()
        }
    }

    pub fn default_id(source: &str, target: &str) -> String {
        format!("{}--To--{}", source, target)
    }
}

/// Checks a raw cost against the OSPF metric range, rejecting or clamping it according to `policy`.
pub fn normalize_cost(link: &str, cost: i64, policy: CostPolicy) -> Result<u32> {
    if (MIN_COST as i64..=MAX_COST as i64).contains(&cost) {
        return Ok(cost as u32);
    }

    match policy {
        CostPolicy::Reject => Err(Error::InvalidCost { link: link.to_string(), cost }),
        CostPolicy::Clamp => {
            let clamped = cost.clamp(MIN_COST as i64, MAX_COST as i64) as u32;
            log::warn!("Link {}: cost {} outside {}..={}, clamped to {}.", link, cost, MIN_COST, MAX_COST, clamped);
            Ok(clamped)
        }
    }
}
