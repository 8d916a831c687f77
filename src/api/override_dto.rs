use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A what-if scenario as supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverridesDto {
    #[serde(default)]
    pub name: Option<String>,

    /// Sparse per-link changes keyed by link id.
    #[serde(default)]
    pub overrides: BTreeMap<String, LinkOverrideDto>,

    /// Routers to take out of service; every link touching them goes down.
    #[serde(default)]
    pub failed_nodes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOverrideDto {
    #[serde(default, alias = "cost")]
    pub forward_cost: Option<i64>,
    #[serde(default)]
    pub reverse_cost: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}
