pub mod cloud_provider;
pub mod cost;
pub mod recommendation;
pub mod types;
pub mod workload;

pub use cloud_provider::*;
pub use cost::*;
pub use recommendation::*;
pub use types::*;
pub use workload::*;
