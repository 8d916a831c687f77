use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON input: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Unknown node id: {0}")]
    UnknownNodeId(String),

    #[error("Unknown group id: {0}")]
    UnknownGroupId(String),

    #[error("Override references unknown link id: {0}")]
    UnknownLinkId(String),

    #[error("Duplicate node id in topology: {0}")]
    DuplicateNodeId(String),

    #[error("Duplicate link id in topology: {0}")]
    DuplicateLinkId(String),

    #[error("Invalid cost {cost} on link {link}: costs must be within 1..=65535")]
    InvalidCost { link: String, cost: i64 },

    #[error("Invalid link status '{0}': expected 'up' or 'down'")]
    InvalidStatus(String),

    #[error("Batch analysis was cancelled before completion")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
