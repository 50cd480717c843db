pub mod assembly;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

pub use assembly::*;
pub use error::*;
pub use routes::*;
pub use state::*;
pub use views::*;
