//! Profile schema, environment lists and host configuration

mod env;
mod host_config;
mod profile;

pub use env::*;
pub use host_config::*;
pub use profile::*;
