//! Host-side container settings derived during resolution

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cgroup permissions given to mapped devices
pub const DEFAULT_CGROUP_PERMISSIONS: &str = "rwm";

/// Host configuration of one container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostConfig {
    #[serde(default)]
    pub privileged: bool,

    /// Network namespace mode (only "host" is ever set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,

    /// IPC namespace mode (only "host" is ever set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipc_mode: Option<String>,

    /// Bind mounts, profile volumes first
    #[serde(default)]
    pub mounts: Vec<BindMount>,

    /// Device mappings in stage order
    #[serde(default)]
    pub devices: Vec<DeviceMapping>,
}

/// Host path bound into the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BindMount {
    /// Absolute host path
    pub source: PathBuf,
    pub target: String,
    #[serde(default)]
    pub read_only: bool,
}

/// Host device node exposed to the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceMapping {
    pub path_on_host: String,
    pub path_in_container: String,
    #[serde(default = "default_cgroup_permissions")]
    pub cgroup_permissions: String,
}

fn default_cgroup_permissions() -> String {
    DEFAULT_CGROUP_PERMISSIONS.to_string()
}

impl DeviceMapping {
    /// Map `path` to the same path inside the container with `rwm` access
    pub fn same_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path_in_container: path.clone(),
            path_on_host: path,
            cgroup_permissions: default_cgroup_permissions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_device() {
        let device = DeviceMapping::same_path("/dev/video0");
        assert_eq!(device.path_on_host, "/dev/video0");
        assert_eq!(device.path_in_container, "/dev/video0");
        assert_eq!(device.cgroup_permissions, "rwm");
    }

    #[test]
    fn test_device_permissions_default_when_omitted() {
        let yaml = "PathOnHost: /dev/dri/renderD128\nPathInContainer: /dev/dri/renderD128\n";
        let device: DeviceMapping = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(device.cgroup_permissions, DEFAULT_CGROUP_PERMISSIONS);
    }
}
