// Domain value objects
pub mod address_range;
pub mod deployment_mode;
pub mod standard;

pub use address_range::*;
pub use deployment_mode::*;
pub use standard::*;
