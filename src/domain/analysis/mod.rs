pub mod aggregation;
pub mod batch;
pub mod cost_matrix;
pub mod impact;
pub mod traffic;

/// Target for structured analysis events emitted through `tracing`.
pub const ANALYTICS_TARGET: &str = "analytics";
