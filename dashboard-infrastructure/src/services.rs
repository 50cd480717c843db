pub mod webservice_client;

pub use webservice_client::*;
