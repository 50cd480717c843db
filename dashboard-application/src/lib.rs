// Dashboard Application Layer

pub mod commands;
pub mod dtos;
pub mod error;
pub mod events;
pub mod queries;
pub mod state;

#[cfg(test)]
mod testing;

pub use dtos::*;
pub use error::AppError;
pub use events::RouteErrorEvent;
pub use state::AppState;
