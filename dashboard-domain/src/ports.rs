// Port traits (interfaces)
// Define what the dashboard needs from the outside world

pub mod webservice;

pub use webservice::*;
