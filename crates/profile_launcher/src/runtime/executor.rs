//! Launch executor - creates and starts the containers of a plan

use crate::config::{ContainerSpec, HostConfig};
use crate::resolve::LaunchPlan;
use async_trait::async_trait;

/// Everything the runtime needs to create one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRequest {
    pub name: String,
    pub image: String,
    /// Empty means the image's own entrypoint
    pub entrypoint: Vec<String>,
    /// `KEY=VALUE` strings
    pub env: Vec<String>,
    pub host_config: HostConfig,
}

impl ContainerRequest {
    pub fn from_spec(spec: &ContainerSpec) -> Result<Self, LaunchError> {
        if spec.image.trim().is_empty() {
            return Err(LaunchError::MissingImage {
                container: spec.name.clone(),
            });
        }

        Ok(Self {
            name: spec.name.clone(),
            image: spec.image.clone(),
            entrypoint: spec.entrypoint_args(),
            env: spec.envs.to_strings(),
            host_config: spec.host_config.clone(),
        })
    }
}

/// Container runtime that can create and start a container.
///
/// Returns the runtime's identifier for the started container.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn create_and_start(&self, request: &ContainerRequest) -> Result<String, LaunchError>;
}

/// A container the executor started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedContainer {
    pub name: String,
    pub id: String,
}

/// Launch executor
pub struct Executor<R> {
    runtime: R,
}

impl<R: ContainerRuntime> Executor<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Launch every container of the plan in order.
    ///
    /// All requests are built before the first runtime call. A runtime
    /// failure stops the launch; containers already started keep running.
    pub async fn launch(&self, plan: &LaunchPlan) -> Result<Vec<LaunchedContainer>, LaunchError> {
        let requests = plan
            .containers()
            .iter()
            .map(ContainerRequest::from_spec)
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Launching {} containers...", requests.len());

        let mut launched = Vec::with_capacity(requests.len());
        for request in &requests {
            log::info!("[{}] Starting container from {}", request.name, request.image);
            log::debug!("[{}] {:?}", request.name, request);

            let id = match self.runtime.create_and_start(request).await {
                Ok(id) => id,
                Err(e) => {
                    if !launched.is_empty() {
                        log::warn!(
                            "{} containers were already started and are left running",
                            launched.len()
                        );
                    }
                    return Err(e);
                }
            };

            log::info!("[{}] Container started with id {}", request.name, id);
            launched.push(LaunchedContainer {
                name: request.name.clone(),
                id,
            });
        }

        log::info!("All containers launched successfully");
        Ok(launched)
    }
}

/// Errors that can occur when launching containers
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Container '{container}' has no image")]
    MissingImage { container: String },

    #[error("Failed to connect to container runtime: {0}")]
    Connect(#[source] bollard::errors::Error),

    #[error("Runtime failed for container '{container}': {source}")]
    Runtime {
        container: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl LaunchError {
    pub fn runtime(
        container: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        LaunchError::Runtime {
            container: container.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvList, LaunchProfile};
    use crate::resolve::LaunchDraft;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRuntime {
        requests: Mutex<Vec<ContainerRequest>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl ContainerRuntime for RecordingRuntime {
        async fn create_and_start(&self, request: &ContainerRequest) -> Result<String, LaunchError> {
            if self.fail_on.as_deref() == Some(request.name.as_str()) {
                return Err(LaunchError::runtime(&request.name, "conflict"));
            }
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            Ok(format!("id-{}", requests.len()))
        }
    }

    fn container(name: &str, image: &str) -> ContainerSpec {
        ContainerSpec {
            name: name.to_string(),
            image: image.to_string(),
            entrypoint: "/script/entrypoint.sh  --port 8080".to_string(),
            envs: EnvList::from(vec!["A=1".to_string()]),
            ..Default::default()
        }
    }

    fn plan(containers: Vec<ContainerSpec>) -> LaunchPlan {
        LaunchDraft::new(LaunchProfile {
            containers,
            ..Default::default()
        })
        .finalize()
    }

    #[test]
    fn test_request_from_spec() {
        let request = ContainerRequest::from_spec(&container("Client", "test:dev")).unwrap();
        assert_eq!(request.entrypoint, vec!["/script/entrypoint.sh", "--port", "8080"]);
        assert_eq!(request.env, vec!["A=1"]);
    }

    #[test]
    fn test_empty_entrypoint_uses_image_default() {
        let mut spec = container("Client", "test:dev");
        spec.entrypoint = String::new();
        let request = ContainerRequest::from_spec(&spec).unwrap();
        assert!(request.entrypoint.is_empty());
    }

    #[tokio::test]
    async fn test_launch_in_order() {
        let executor = Executor::new(RecordingRuntime::default());
        let launched = executor
            .launch(&plan(vec![container("Client", "a:1"), container("Server", "b:1")]))
            .await
            .unwrap();

        assert_eq!(
            launched,
            vec![
                LaunchedContainer {
                    name: "Client".to_string(),
                    id: "id-1".to_string(),
                },
                LaunchedContainer {
                    name: "Server".to_string(),
                    id: "id-2".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_image_fails_before_any_launch() {
        let executor = Executor::new(RecordingRuntime::default());
        let result = executor
            .launch(&plan(vec![container("Client", "a:1"), container("Server", "")]))
            .await;

        assert!(matches!(result, Err(LaunchError::MissingImage { ref container }) if container == "Server"));
        assert!(executor.runtime().requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_runtime_failure_stops_launch() {
        let executor = Executor::new(RecordingRuntime {
            fail_on: Some("Server".to_string()),
            ..Default::default()
        });
        let result = executor
            .launch(&plan(vec![
                container("Client", "a:1"),
                container("Server", "b:1"),
                container("Worker", "c:1"),
            ]))
            .await;

        assert!(matches!(result, Err(LaunchError::Runtime { .. })));
        let requests = executor.runtime().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "Client");
    }
}
