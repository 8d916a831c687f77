pub mod adjacency;
pub mod link;
pub mod network_topology;
pub mod node;
