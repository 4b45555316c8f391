//! Profile resolution pipeline
//!
//! Turns a loaded [`LaunchProfile`] plus command-line overrides into a
//! [`LaunchPlan`]. Stages run in a fixed order:
//!
//! 1. env files (and the bare target device line)
//! 2. `KEY=VALUE` overrides
//! 3. volumes
//! 4. target device policy
//! 5. input source policy
//! 6. host network and IPC, unless a private network is requested
//!
//! Any failure aborts the whole resolution.

mod device;
mod draft;
mod env;
mod input;
mod network;
mod volume;

pub use device::*;
pub use draft::*;
pub use env::*;
pub use input::*;
pub use network::*;
pub use volume::*;

use crate::config::LaunchProfile;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Runtime inputs to resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Directory holding the profile and its env files
    pub config_dir: PathBuf,
    /// Directory relative volume sources resolve against
    pub working_dir: PathBuf,
    /// Replaces the profile's `TargetDevice` when set
    pub target_device: Option<String>,
    /// Replaces the profile's `InputSrc` when set
    pub input_source: Option<String>,
    /// Extra `source:target` volumes for every container
    pub volumes: Vec<String>,
    /// `KEY=VALUE` overrides for every container
    pub env_overrides: Vec<String>,
    /// Keep containers out of the host network and IPC namespaces
    pub private_network: bool,
}

impl ResolveOptions {
    /// Run every stage over `profile`
    pub fn resolve(&self, profile: LaunchProfile) -> Result<LaunchPlan, ResolveError> {
        log::info!("Resolving {} containers", profile.containers.len());

        let plan = LaunchDraft::new(profile)
            .with_globals(self.target_device.as_deref(), self.input_source.as_deref())
            .with_env_files(&self.config_dir)?
            .with_env_overrides(&self.env_overrides)?
            .with_volumes(&self.volumes, &self.working_dir)?
            .with_target_device()?
            .with_input_source()?
            .with_host_network(!self.private_network)
            .finalize();

        Ok(plan)
    }
}

/// Errors that can occur while resolving a profile
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to read env file '{}' for container '{container}': {source}", .path.display())]
    EnvFileRead {
        container: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not exactly one `=`, an empty key, or only whitespace
    #[error("Invalid env override '{0}'. Expected 'KEY=VALUE'")]
    InvalidOverrideFormat(String),

    /// Not exactly one `:`, or an empty source or target
    #[error("Invalid volume '{0}'. Expected 'source:target'")]
    InvalidVolumeFormat(String),

    #[error("Failed to resolve volume path '{volume}': {reason}")]
    VolumePath { volume: String, reason: String },

    #[error("Target device not supported: {0}")]
    UnsupportedTargetDevice(String),

    #[error("Invalid GPU index in target device '{value}': {source}")]
    InvalidGpuIndex {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Input source was not set")]
    MissingInputSource,
}
