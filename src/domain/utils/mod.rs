pub mod cancellation;
pub mod id;
