use std::path::Path;

use crate::config::AnalysisConfig;
use crate::domain::simulation::overrides::Scenario;
use crate::domain::topology::network_topology::NetworkTopology;
use crate::error::Result;
use crate::loader::parser::{parse_overrides_file, parse_topology_file};

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

pub fn load_topology(file_path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<NetworkTopology> {
    let dto = parse_topology_file(file_path)?;

    let topology = NetworkTopology::try_from((dto, &config.ingestion))?;
    log::info!("Topology constructed: {} nodes, {} links, {} groups.", topology.node_count(), topology.link_count(), topology.groups().count());

    Ok(topology)
}

pub fn load_scenario(file_path: impl AsRef<Path>, topology: &NetworkTopology, config: &AnalysisConfig) -> Result<Scenario> {
    let dto = parse_overrides_file(file_path)?;

    let scenario = Scenario::try_from((dto, topology, &config.ingestion))?;
    log::info!("Scenario '{}' loaded with {} link overrides.", scenario.name, scenario.overrides.len());

    Ok(scenario)
}
