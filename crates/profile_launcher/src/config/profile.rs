//! Profile YAML schema definitions

use super::env::EnvList;
use super::host_config::HostConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name of the profile inside a config directory
pub const PROFILE_FILE_NAME: &str = "profile_config.yaml";

/// Root profile configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchProfile {
    /// Containers in launch order
    pub containers: Vec<ContainerSpec>,

    /// Capture device path or stream URL, broadcast to every container
    #[serde(default, rename = "InputSrc")]
    pub input_source: String,

    /// Compute device selector, broadcast to every container
    #[serde(default)]
    pub target_device: String,
}

/// One container of the profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSpec {
    pub name: String,

    /// Image reference
    #[serde(default, rename = "DockerImage")]
    pub image: String,

    /// Env file path relative to the config directory
    #[serde(
        default,
        rename = "EnvironmentVariableFiles",
        skip_serializing_if = "Option::is_none"
    )]
    pub env_file: Option<String>,

    /// Command line, split on whitespace at launch
    #[serde(default)]
    pub entrypoint: String,

    #[serde(default)]
    pub envs: EnvList,

    /// Raw `source:target` volume strings
    #[serde(default)]
    pub volumes: Vec<String>,

    #[serde(default)]
    pub host_config: HostConfig,
}

impl ContainerSpec {
    /// Entrypoint as an argument vector
    pub fn entrypoint_args(&self) -> Vec<String> {
        self.entrypoint
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl LaunchProfile {
    /// Load `profile_config.yaml` from a config directory
    pub fn from_dir(config_dir: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = config_dir.as_ref().join(PROFILE_FILE_NAME);
        let content = std::fs::read_to_string(&path).map_err(|e| ProfileError::ConfigRead {
            path: path.clone(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a profile from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ProfileError> {
        let profile: LaunchProfile =
            serde_yaml::from_str(content).map_err(ProfileError::ConfigFormat)?;

        for name in profile.duplicate_names() {
            log::warn!(
                "Container name '{}' appears more than once; the runtime may reject it",
                name
            );
        }

        Ok(profile)
    }

    /// Names used by more than one container, in first-seen order
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for container in &self.containers {
            let name = container.name.as_str();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    pub fn container_names(&self) -> Vec<&str> {
        self.containers.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Errors that can occur when loading a profile
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read profile '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse profile: {0}")]
    ConfigFormat(#[from] serde_yaml::Error),
}
