use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::api::override_dto::OverridesDto;
use crate::api::topology_dto::TopologyDto;
use crate::error::{Error, Result};

/// Parses a JSON file into a given type `T`.
///
/// This function reads a file from `file_path`, attempts to parse it
/// as JSON, and returns an instance of `T`.
///
/// Errors are automatically converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path.as_ref()).map_err(Error::IoError)?;

    let parsed_data: T = serde_json::from_str(&data).map_err(Error::DeserializationError)?;

    Ok(parsed_data)
}

pub fn parse_topology_file(file_path: impl AsRef<Path>) -> Result<TopologyDto> {
    let dto: TopologyDto = parse_json_file(file_path.as_ref())?;
    log::info!("Parsed topology file '{}': {} nodes, {} links.", file_path.as_ref().display(), dto.nodes.len(), dto.links.len());
    Ok(dto)
}

pub fn parse_overrides_file(file_path: impl AsRef<Path>) -> Result<OverridesDto> {
    let dto: OverridesDto = parse_json_file(file_path.as_ref())?;
    log::info!("Parsed overrides file '{}': {} link overrides.", file_path.as_ref().display(), dto.overrides.len());
    Ok(dto)
}
