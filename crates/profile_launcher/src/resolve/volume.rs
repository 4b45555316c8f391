//! `source:target` volume strings to bind mounts

use super::ResolveError;
use crate::config::{BindMount, LaunchProfile};
use std::path::{Component, Path, PathBuf};

/// A parsed `source:target` volume string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSpec {
    pub source: String,
    pub target: String,
}

impl VolumeSpec {
    pub fn parse(input: &str) -> Result<Self, ResolveError> {
        let parts: Vec<&str> = input.split(':').collect();
        match parts.as_slice() {
            [source, target] if !source.is_empty() && !target.is_empty() => Ok(Self {
                source: source.to_string(),
                target: target.to_string(),
            }),
            _ => Err(ResolveError::InvalidVolumeFormat(input.to_string())),
        }
    }

    /// Resolve the source against `base_dir` into a read-write bind mount
    pub fn resolve(&self, base_dir: &Path) -> Result<BindMount, ResolveError> {
        let source = absolutize(base_dir, Path::new(&self.source)).map_err(|reason| {
            ResolveError::VolumePath {
                volume: format!("{}:{}", self.source, self.target),
                reason,
            }
        })?;

        Ok(BindMount {
            source,
            target: self.target.clone(),
            read_only: false,
        })
    }
}

/// Lexically normalize `path` joined onto `base`
fn absolutize(base: &Path, path: &Path) -> Result<PathBuf, String> {
    let joined = base.join(path);
    if !joined.is_absolute() {
        return Err(format!("base directory '{}' is not absolute", base.display()));
    }

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    return Err(format!("'{}' escapes the filesystem root", path.display()));
                }
            }
            Component::Normal(part) => resolved.push(part),
        }
    }
    Ok(resolved)
}

/// Resolve a list of volume strings, failing on the first bad entry
pub fn resolve_volumes(volumes: &[String], base_dir: &Path) -> Result<Vec<BindMount>, ResolveError> {
    volumes
        .iter()
        .map(|v| VolumeSpec::parse(v)?.resolve(base_dir))
        .collect()
}

/// Mount each container's own volumes, then the extra ones.
///
/// Every mount is resolved before any container is modified.
pub fn apply_volumes(
    profile: &mut LaunchProfile,
    extra_volumes: &[String],
    base_dir: &Path,
) -> Result<(), ResolveError> {
    let extra = resolve_volumes(extra_volumes, base_dir)?;

    let declared = profile
        .containers
        .iter()
        .map(|c| resolve_volumes(&c.volumes, base_dir))
        .collect::<Result<Vec<_>, _>>()?;

    for (container, mounts) in profile.containers.iter_mut().zip(declared) {
        log::debug!(
            "[{}] Adding {} bind mounts",
            container.name,
            mounts.len() + extra.len()
        );
        container.host_config.mounts.extend(mounts);
        container.host_config.mounts.extend(extra.iter().cloned());
    }

    Ok(())
}
