//! Profile Launcher
//!
//! Launches the containers described by a YAML profile.
//!
//! # Overview
//!
//! The launcher:
//! - Loads `profile_config.yaml` from a config directory
//! - Fills each container's environment from its env file and `-e` overrides
//! - Binds profile and `-v` volumes into every container
//! - Maps GPU render nodes or grants privileged mode from the target device
//! - Maps the capture device and sets `INPUTSRC` from the input source
//! - Creates and starts each container through the Docker Engine API
//!
//! # Example Profile
//!
//! ```yaml
//! Containers:
//!   - Name: Client
//!     DockerImage: camera-client:dev
//!     EnvironmentVariableFiles: client.env
//!     Entrypoint: /script/entrypoint.sh
//!     Volumes:
//!       - ./results:/tmp/results
//!   - Name: Server
//!     DockerImage: model-server:dev
//!     EnvironmentVariableFiles: server.env
//!     Entrypoint: /script/serve.sh --port 9000
//! InputSrc: rtsp://127.0.0.1:8554/camera_0
//! TargetDevice: GPU.0
//! ```

pub mod cli;
pub mod config;
pub mod resolve;
pub mod runtime;

pub use cli::LaunchArgs;
pub use config::{
    BindMount, ContainerSpec, DeviceMapping, EnvEntry, EnvList, HostConfig, LaunchProfile,
    ProfileError,
};
pub use resolve::{
    InputSource, LaunchDraft, LaunchPlan, ResolveError, ResolveOptions, TargetDevice,
};
pub use runtime::{
    ContainerRequest, ContainerRuntime, DockerRuntime, Executor, LaunchError, LaunchedContainer,
};
