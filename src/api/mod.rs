pub mod override_dto;
pub mod topology_dto;
