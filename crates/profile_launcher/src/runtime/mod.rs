//! Runtime components for container launching

pub mod docker;
pub mod executor;

pub use docker::*;
pub use executor::*;
