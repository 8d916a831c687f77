pub mod analysis;
pub mod routing;
pub mod simulation;
pub mod topology;
pub mod utils;
