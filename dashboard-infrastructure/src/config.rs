pub mod app_config;
pub mod credentials;

pub use app_config::*;
pub use credentials::*;
