// Domain entities
pub mod access_policy;
pub mod runtime_config;
pub mod task;
pub mod task_result;

pub use access_policy::*;
pub use runtime_config::*;
pub use task::*;
pub use task_result::*;
