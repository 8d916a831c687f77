pub mod dijkstra;
pub mod distance;
pub mod path;
pub mod path_enumerator;
