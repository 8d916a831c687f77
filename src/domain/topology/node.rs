use serde::{Deserialize, Serialize};

use crate::domain::utils::id::{GroupId, NodeId};

/// A router in the analysed topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// The unique identifier for the router.
    pub id: NodeId,

    /// Region the router belongs to (typically a country). Group-to-group
    /// queries aggregate over this attribute.
    pub group: GroupId,

    pub hostname: Option<String>,
    pub label: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, group: impl Into<String>) -> Self {
        Self { id: NodeId::new(id), group: GroupId::new(group), hostname: None, label: None }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().or(self.hostname.as_deref()).unwrap_or(self.id.as_str())
    }
}
