use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TopologyDto {
    pub nodes: Vec<NodeDto>,
    pub links: Vec<LinkDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDto {
    pub id: String,
    #[serde(alias = "country")]
    pub group: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// A link endpoint as found in exported topologies: either the bare node id or the
/// embedded node object. Ingestion reduces both forms to the id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EndpointDto {
    Id(String),
    Node { id: String },
}

impl EndpointDto {
    pub fn into_id(self) -> String {
        match self {
            EndpointDto::Id(id) => id,
            EndpointDto::Node { id } => id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    #[serde(default)]
    pub id: Option<String>,
    pub source: EndpointDto,
    pub target: EndpointDto,
    #[serde(alias = "cost")]
    pub forward_cost: i64,
    #[serde(default)]
    pub reverse_cost: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}
