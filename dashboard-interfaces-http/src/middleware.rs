pub mod access;
pub mod errors;

pub use access::*;
pub use errors::*;
