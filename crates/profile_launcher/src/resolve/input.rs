//! Input source policy

use super::ResolveError;
use crate::config::{DeviceMapping, LaunchProfile};

/// Env variable carrying the input source into every container
pub const INPUT_SOURCE_ENV: &str = "INPUTSRC";

/// Where the workload reads frames from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Local capture device such as `/dev/video0`
    VideoDevice(String),
    /// Anything else, typically an RTSP or file URL
    Stream(String),
}

impl InputSource {
    pub fn parse(value: &str) -> Result<Self, ResolveError> {
        if value.is_empty() {
            Err(ResolveError::MissingInputSource)
        } else if value.contains("/video") {
            Ok(InputSource::VideoDevice(value.to_string()))
        } else {
            Ok(InputSource::Stream(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InputSource::VideoDevice(value) | InputSource::Stream(value) => value,
        }
    }
}

/// Map the capture device (if any) and set `INPUTSRC` on every container
pub fn apply_input_source(profile: &mut LaunchProfile) -> Result<InputSource, ResolveError> {
    let source = InputSource::parse(&profile.input_source)?;

    for container in &mut profile.containers {
        if let InputSource::VideoDevice(ref device) = source {
            log::debug!("[{}] Mapping capture device {}", container.name, device);
            container
                .host_config
                .devices
                .push(DeviceMapping::same_path(device.clone()));
        }
        container.envs.set(INPUT_SOURCE_ENV, source.as_str());
    }

    Ok(source)
}
