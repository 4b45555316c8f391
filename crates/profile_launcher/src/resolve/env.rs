//! Environment files and command-line overrides

use super::ResolveError;
use crate::config::{EnvList, LaunchProfile};
use std::path::Path;

/// Read every container's env file, then append the bare target device line.
///
/// All files are read before any container is touched. A container without
/// `EnvironmentVariableFiles` keeps the `Envs` declared in the profile.
pub fn load_env_files(profile: &mut LaunchProfile, config_dir: &Path) -> Result<(), ResolveError> {
    let mut loaded = Vec::with_capacity(profile.containers.len());

    for container in &profile.containers {
        let Some(ref env_file) = container.env_file else {
            loaded.push(None);
            continue;
        };

        let path = config_dir.join(env_file);
        let contents =
            std::fs::read_to_string(&path).map_err(|e| ResolveError::EnvFileRead {
                container: container.name.clone(),
                path: path.clone(),
                source: e,
            })?;
        log::debug!("[{}] Loaded env file {}", container.name, path.display());
        loaded.push(Some(EnvList::from_file_contents(&contents)));
    }

    for (container, envs) in profile.containers.iter_mut().zip(loaded) {
        if let Some(envs) = envs {
            container.envs = envs;
        }
        if !profile.target_device.is_empty() {
            container.envs.push_raw(profile.target_device.clone());
        }
    }

    Ok(())
}

/// A validated `KEY=VALUE` override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverride {
    pub key: String,
    pub value: String,
}

impl EnvOverride {
    /// Parse an override. Exactly `""` yields `None` and is skipped.
    pub fn parse(input: &str) -> Result<Option<Self>, ResolveError> {
        if input.is_empty() {
            return Ok(None);
        }
        if input.trim().is_empty() {
            return Err(ResolveError::InvalidOverrideFormat(input.to_string()));
        }

        let parts: Vec<&str> = input.split('=').collect();
        match parts.as_slice() {
            [key, value] if !key.is_empty() => Ok(Some(Self {
                key: key.to_string(),
                value: value.to_string(),
            })),
            _ => Err(ResolveError::InvalidOverrideFormat(input.to_string())),
        }
    }

    /// Parse a whole list, failing on the first malformed entry
    pub fn parse_all(inputs: &[String]) -> Result<Vec<Self>, ResolveError> {
        let mut overrides = Vec::new();
        for input in inputs {
            if let Some(parsed) = Self::parse(input)? {
                overrides.push(parsed);
            }
        }
        Ok(overrides)
    }
}

/// Apply overrides to every container, replacing by key or appending
pub fn apply_overrides(profile: &mut LaunchProfile, overrides: &[EnvOverride]) {
    for container in &mut profile.containers {
        for o in overrides {
            log::debug!("[{}] Override {}={}", container.name, o.key, o.value);
            container.envs.set(&o.key, &o.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerSpec;
    use std::fs;

    fn profile_with_envs(envs: &[&str]) -> LaunchProfile {
        let envs: Vec<String> = envs.iter().map(|s| s.to_string()).collect();
        LaunchProfile {
            containers: vec![
                ContainerSpec {
                    name: "Client".to_string(),
                    envs: EnvList::from(envs.clone()),
                    ..Default::default()
                },
                ContainerSpec {
                    name: "Server".to_string(),
                    envs: EnvList::from(envs),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_override_replaces_existing() {
        let mut profile = profile_with_envs(&["TEST_ENV=123"]);
        let overrides = EnvOverride::parse_all(&["TEST_ENV=test".to_string()]).unwrap();
        apply_overrides(&mut profile, &overrides);
        for container in &profile.containers {
            assert_eq!(container.envs.to_strings(), vec!["TEST_ENV=test"]);
        }
    }

    #[test]
    fn test_override_appends_new() {
        let mut profile = profile_with_envs(&["TEST_ENV=123"]);
        let overrides = EnvOverride::parse_all(&["NEW_ENV=test".to_string()]).unwrap();
        apply_overrides(&mut profile, &overrides);
        for container in &profile.containers {
            assert_eq!(container.envs.to_strings(), vec!["TEST_ENV=123", "NEW_ENV=test"]);
        }
    }

    #[test]
    fn test_last_override_wins_at_original_position() {
        let mut profile = profile_with_envs(&["A=0", "K=1", "B=2"]);
        let overrides =
            EnvOverride::parse_all(&["K=A".to_string(), "K=B".to_string()]).unwrap();
        apply_overrides(&mut profile, &overrides);
        assert_eq!(
            profile.containers[0].envs.to_strings(),
            vec!["A=0", "K=B", "B=2"]
        );
    }

    #[test]
    fn test_invalid_overrides() {
        for input in ["TEST_ENV", "A=B=C", "   ", "=value"] {
            let result = EnvOverride::parse(input);
            assert!(
                matches!(result, Err(ResolveError::InvalidOverrideFormat(_))),
                "expected '{}' to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_empty_override_skipped() {
        let overrides =
            EnvOverride::parse_all(&["".to_string(), "A=1".to_string()]).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].key, "A");
    }

    #[test]
    fn test_parse_all_rejects_whole_list() {
        let inputs = vec!["A=1".to_string(), "broken".to_string()];
        assert!(EnvOverride::parse_all(&inputs).is_err());
    }

    #[test]
    fn test_load_env_files_with_target_device() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("client.env"), "TEST_ENV=123\nTEST_ENV2=abc\n").unwrap();

        let mut profile = LaunchProfile {
            containers: vec![ContainerSpec {
                name: "Client".to_string(),
                env_file: Some("client.env".to_string()),
                ..Default::default()
            }],
            target_device: "CPU".to_string(),
            ..Default::default()
        };

        load_env_files(&mut profile, dir.path()).unwrap();
        assert_eq!(
            profile.containers[0].envs.to_strings(),
            vec!["TEST_ENV=123", "TEST_ENV2=abc", "", "CPU"]
        );
    }

    #[test]
    fn test_load_env_files_missing_file_leaves_profile_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("client.env"), "A=1").unwrap();

        let mut profile = LaunchProfile {
            containers: vec![
                ContainerSpec {
                    name: "Client".to_string(),
                    env_file: Some("client.env".to_string()),
                    ..Default::default()
                },
                ContainerSpec {
                    name: "Server".to_string(),
                    env_file: Some("missing.env".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let result = load_env_files(&mut profile, dir.path());
        assert!(matches!(
            result,
            Err(ResolveError::EnvFileRead { ref container, .. }) if container == "Server"
        ));
        assert!(profile.containers[0].envs.is_empty());
    }

    #[test]
    fn test_container_without_env_file_keeps_declared_envs() {
        let dir = tempfile::tempdir().unwrap();
        let mut profile = profile_with_envs(&["A=1"]);
        load_env_files(&mut profile, dir.path()).unwrap();
        assert_eq!(profile.containers[0].envs.to_strings(), vec!["A=1"]);
    }
}
