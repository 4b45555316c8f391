//! Target device policy

use super::ResolveError;
use crate::config::{DeviceMapping, LaunchProfile};
use std::fmt;

/// DRM render nodes are numbered from 128
pub const RENDER_NODE_BASE: u32 = 128;

/// Compute device the workload should run on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetDevice {
    /// No selector given; unknown backends still get full device access
    Unset,
    Cpu,
    /// Any GPU
    Gpu,
    Auto,
    /// Multi-device selector, e.g. `MULTI:GPU.0,CPU`
    Multi(String),
    /// One specific GPU, `GPU.<index>`
    GpuIndex(u32),
}

impl TargetDevice {
    pub fn parse(value: &str) -> Result<Self, ResolveError> {
        match value {
            "" => return Ok(TargetDevice::Unset),
            "CPU" => return Ok(TargetDevice::Cpu),
            "GPU" => return Ok(TargetDevice::Gpu),
            "AUTO" => return Ok(TargetDevice::Auto),
            _ => {}
        }

        if value.contains("MULTI") {
            return Ok(TargetDevice::Multi(value.to_string()));
        }

        if let Some(index) = value.strip_prefix("GPU.") {
            let index: u32 = index.parse().map_err(|e| ResolveError::InvalidGpuIndex {
                value: value.to_string(),
                source: e,
            })?;
            if index.checked_add(RENDER_NODE_BASE).is_none() {
                return Err(ResolveError::UnsupportedTargetDevice(value.to_string()));
            }
            return Ok(TargetDevice::GpuIndex(index));
        }

        Err(ResolveError::UnsupportedTargetDevice(value.to_string()))
    }

    /// Whether containers must run privileged to reach the device
    pub fn requires_privileged(&self) -> bool {
        matches!(
            self,
            TargetDevice::Unset | TargetDevice::Gpu | TargetDevice::Auto | TargetDevice::Multi(_)
        )
    }

    /// Render node path for a specific GPU
    pub fn render_node(&self) -> Option<String> {
        match self {
            TargetDevice::GpuIndex(index) => {
                Some(format!("/dev/dri/renderD{}", RENDER_NODE_BASE + index))
            }
            _ => None,
        }
    }
}

impl fmt::Display for TargetDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetDevice::Unset => f.write_str("<unset>"),
            TargetDevice::Cpu => f.write_str("CPU"),
            TargetDevice::Gpu => f.write_str("GPU"),
            TargetDevice::Auto => f.write_str("AUTO"),
            TargetDevice::Multi(value) => f.write_str(value),
            TargetDevice::GpuIndex(index) => write!(f, "GPU.{}", index),
        }
    }
}

/// Apply the profile's target device to every container
pub fn apply_target_device(profile: &mut LaunchProfile) -> Result<TargetDevice, ResolveError> {
    let device = TargetDevice::parse(&profile.target_device)?;
    let render_node = device.render_node();

    for container in &mut profile.containers {
        if device.requires_privileged() {
            log::debug!("[{}] Privileged for target device {}", container.name, device);
            container.host_config.privileged = true;
        }
        if let Some(ref node) = render_node {
            log::debug!("[{}] Mapping render node {}", container.name, node);
            container
                .host_config
                .devices
                .push(DeviceMapping::same_path(node.clone()));
        }
    }

    Ok(device)
}
