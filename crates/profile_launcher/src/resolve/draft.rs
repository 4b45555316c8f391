//! Launch draft builder and the resolved launch plan

use super::device::apply_target_device;
use super::env::{apply_overrides, load_env_files, EnvOverride};
use super::input::apply_input_source;
use super::network::apply_host_network;
use super::volume::apply_volumes;
use super::ResolveError;
use crate::config::{ContainerSpec, LaunchProfile};
use serde::Serialize;
use std::path::Path;

/// A profile moving through the resolution stages.
///
/// Each stage consumes the draft and hands it back on success. A stage
/// validates all of its input before changing any container.
#[derive(Debug, Clone)]
pub struct LaunchDraft {
    profile: LaunchProfile,
}

impl LaunchDraft {
    pub fn new(profile: LaunchProfile) -> Self {
        Self { profile }
    }

    /// Replace the profile's target device and input source when given
    pub fn with_globals(mut self, target_device: Option<&str>, input_source: Option<&str>) -> Self {
        if let Some(device) = target_device {
            self.profile.target_device = device.to_string();
        }
        if let Some(source) = input_source {
            self.profile.input_source = source.to_string();
        }
        self
    }

    /// Load env files relative to `config_dir`
    pub fn with_env_files(mut self, config_dir: &Path) -> Result<Self, ResolveError> {
        load_env_files(&mut self.profile, config_dir)?;
        Ok(self)
    }

    /// Apply `KEY=VALUE` overrides to every container
    pub fn with_env_overrides(mut self, overrides: &[String]) -> Result<Self, ResolveError> {
        let overrides = EnvOverride::parse_all(overrides)?;
        apply_overrides(&mut self.profile, &overrides);
        Ok(self)
    }

    /// Bind profile volumes plus `extra_volumes`, sources relative to `base_dir`
    pub fn with_volumes(mut self, extra_volumes: &[String], base_dir: &Path) -> Result<Self, ResolveError> {
        apply_volumes(&mut self.profile, extra_volumes, base_dir)?;
        Ok(self)
    }

    pub fn with_target_device(mut self) -> Result<Self, ResolveError> {
        let device = apply_target_device(&mut self.profile)?;
        log::info!("Target device: {}", device);
        Ok(self)
    }

    pub fn with_input_source(mut self) -> Result<Self, ResolveError> {
        let source = apply_input_source(&mut self.profile)?;
        log::info!("Input source: {}", source.as_str());
        Ok(self)
    }

    pub fn with_host_network(mut self, enabled: bool) -> Self {
        if enabled {
            apply_host_network(&mut self.profile);
        }
        self
    }

    pub fn profile(&self) -> &LaunchProfile {
        &self.profile
    }

    pub fn finalize(self) -> LaunchPlan {
        LaunchPlan {
            profile: self.profile,
        }
    }
}

/// Fully resolved profile, read-only from here on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LaunchPlan {
    profile: LaunchProfile,
}

impl LaunchPlan {
    /// Containers in launch order
    pub fn containers(&self) -> &[ContainerSpec] {
        &self.profile.containers
    }

    pub fn target_device(&self) -> &str {
        &self.profile.target_device
    }

    pub fn input_source(&self) -> &str {
        &self.profile.input_source
    }
}

/// Display the launch plan in a human-readable format
impl std::fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Launch Plan")?;
        writeln!(f, "===========")?;
        writeln!(f)?;
        writeln!(f, "Input source: {}", self.input_source())?;
        if !self.target_device().is_empty() {
            writeln!(f, "Target device: {}", self.target_device())?;
        }
        writeln!(f)?;

        writeln!(f, "Containers (in launch order):")?;
        for (i, container) in self.containers().iter().enumerate() {
            let host = &container.host_config;
            writeln!(f)?;
            writeln!(f, "  {}. {} [{}]", i + 1, container.name, container.image)?;
            if !container.entrypoint.is_empty() {
                writeln!(f, "     Entrypoint: {}", container.entrypoint_args().join(" "))?;
            }
            if host.privileged {
                writeln!(f, "     Privileged: true")?;
            }
            if let Some(ref mode) = host.network_mode {
                writeln!(f, "     Network: {}", mode)?;
            }
            if let Some(ref mode) = host.ipc_mode {
                writeln!(f, "     IPC: {}", mode)?;
            }

            if !host.mounts.is_empty() {
                writeln!(f, "     Mounts:")?;
                for mount in &host.mounts {
                    writeln!(f, "       {} -> {}", mount.source.display(), mount.target)?;
                }
            }

            if !host.devices.is_empty() {
                writeln!(f, "     Devices:")?;
                for device in &host.devices {
                    writeln!(
                        f,
                        "       {} -> {} ({})",
                        device.path_on_host, device.path_in_container, device.cgroup_permissions
                    )?;
                }
            }

            if !container.envs.is_empty() {
                writeln!(f, "     Environment:")?;
                for entry in container.envs.iter() {
                    writeln!(f, "       {}", entry)?;
                }
            }
        }

        Ok(())
    }
}
