//! Docker Engine runtime backed by bollard

use super::executor::{ContainerRequest, ContainerRuntime, LaunchError};
use crate::config::HostConfig;
use async_trait::async_trait;
use bollard::container::{Config, CreateContainerOptions, StartContainerOptions};
use bollard::models::{self, MountTypeEnum};
use bollard::Docker;

/// Docker daemon reached through `DOCKER_HOST` or the local socket
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    pub fn connect() -> Result<Self, LaunchError> {
        let docker = Docker::connect_with_local_defaults().map_err(LaunchError::Connect)?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn create_and_start(&self, request: &ContainerRequest) -> Result<String, LaunchError> {
        let options = CreateContainerOptions {
            name: request.name.clone(),
            platform: None,
        };

        let response = self
            .docker
            .create_container(Some(options), container_config(request))
            .await
            .map_err(|e| LaunchError::runtime(&request.name, e))?;

        for warning in &response.warnings {
            log::warn!("[{}] {}", request.name, warning);
        }

        self.docker
            .start_container(&response.id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| LaunchError::runtime(&request.name, e))?;

        Ok(response.id)
    }
}

/// Build the create-container body for a request
fn container_config(request: &ContainerRequest) -> Config<String> {
    Config {
        image: Some(request.image.clone()),
        env: Some(request.env.clone()),
        entrypoint: if request.entrypoint.is_empty() {
            None
        } else {
            Some(request.entrypoint.clone())
        },
        host_config: Some(docker_host_config(&request.host_config)),
        ..Default::default()
    }
}

fn docker_host_config(host: &HostConfig) -> models::HostConfig {
    let mounts = host
        .mounts
        .iter()
        .map(|m| models::Mount {
            typ: Some(MountTypeEnum::BIND),
            source: Some(m.source.to_string_lossy().into_owned()),
            target: Some(m.target.clone()),
            read_only: Some(m.read_only),
            ..Default::default()
        })
        .collect();

    let devices = host
        .devices
        .iter()
        .map(|d| models::DeviceMapping {
            path_on_host: Some(d.path_on_host.clone()),
            path_in_container: Some(d.path_in_container.clone()),
            cgroup_permissions: Some(d.cgroup_permissions.clone()),
        })
        .collect();

    models::HostConfig {
        privileged: Some(host.privileged),
        network_mode: host.network_mode.clone(),
        ipc_mode: host.ipc_mode.clone(),
        mounts: Some(mounts),
        devices: Some(devices),
        ..Default::default()
    }
}
