use crate::error::CortexError;
use crate::executor::runner::{finish_output, ProcessOutput};
use crate::executor::SandboxConfig;
use bollard::container::LogOutput;
use bollard::errors::Error as BollardError;
use bollard::models::{ContainerCreateBody, HostConfig};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, WaitContainerOptions,
};
use bollard::Docker;
use futures::StreamExt;
use std::io::Write;
use tokio::time::Duration;

const SCRIPT_PATH_IN_CONTAINER: &str = "/tmp/code.py";

/// Runs python snippets inside a throwaway, network-less container.
pub struct ContainerRunner {
    docker: Docker,
    config: SandboxConfig,
}

impl ContainerRunner {
    /// Connects to the local daemon and pings it once.
    pub async fn connect(config: SandboxConfig) -> Result<Self, CortexError> {
        let docker = Docker::connect_with_local_defaults()?;
        docker.ping().await?;
        log::info!(
            "container runtime reachable, using image {} ({} MiB, {:.0}% cpu)",
            config.container_image,
            config.memory_limit_bytes / (1024 * 1024),
            config.cpu_percent()
        );
        Ok(Self { docker, config })
    }

    pub async fn run_python(
        &self,
        source: &str,
        timeout_seconds: u64,
    ) -> Result<ProcessOutput, CortexError> {
        let mut script = tempfile::Builder::new()
            .prefix("cortex-")
            .suffix(".py")
            .tempfile()?;
        script.write_all(source.as_bytes())?;
        script.flush()?;

        let host_path = script.path().to_str().ok_or_else(|| {
            CortexError::ContainerError("temporary path is not valid UTF-8".to_string())
        })?;

        let body = self.container_body(host_path);
        let container_id = self.create(body).await?;

        let outcome = self.start_and_collect(&container_id, timeout_seconds).await;
        self.remove(&container_id).await;

        // `script` is dropped (and deleted) here, after the container is gone
        outcome
    }

    fn container_body(&self, host_path: &str) -> ContainerCreateBody {
        ContainerCreateBody {
            image: Some(self.config.container_image.clone()),
            cmd: Some(vec![
                "python".to_string(),
                SCRIPT_PATH_IN_CONTAINER.to_string(),
            ]),
            network_disabled: Some(true),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            host_config: Some(HostConfig {
                binds: Some(vec![format!("{}:{}:ro", host_path, SCRIPT_PATH_IN_CONTAINER)]),
                memory: Some(self.config.memory_limit_bytes),
                cpu_period: Some(self.config.cpu_period),
                cpu_quota: Some(self.config.cpu_quota),
                network_mode: Some("none".to_string()),
                readonly_rootfs: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    async fn create(&self, body: ContainerCreateBody) -> Result<String, CortexError> {
        match self
            .docker
            .create_container(None::<CreateContainerOptions>, body.clone())
            .await
        {
            Ok(response) => Ok(response.id),
            Err(BollardError::DockerResponseServerError {
                status_code: 404, ..
            }) => {
                self.pull_image().await?;
                let response = self
                    .docker
                    .create_container(None::<CreateContainerOptions>, body)
                    .await?;
                Ok(response.id)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn pull_image(&self) -> Result<(), CortexError> {
        log::info!("pulling image {}", self.config.container_image);

        let options = CreateImageOptions {
            from_image: Some(self.config.container_image.clone()),
            ..Default::default()
        };
        let mut progress = Box::pin(self.docker.create_image(Some(options), None, None));
        while let Some(step) = progress.next().await {
            step?;
        }
        Ok(())
    }

    async fn start_and_collect(
        &self,
        container_id: &str,
        timeout_seconds: u64,
    ) -> Result<ProcessOutput, CortexError> {
        self.docker
            .start_container(container_id, None::<StartContainerOptions>)
            .await?;

        let mut wait_stream = self
            .docker
            .wait_container(container_id, None::<WaitContainerOptions>);
        let deadline = tokio::time::sleep(Duration::from_secs(timeout_seconds));

        let wait_outcome = tokio::select! {
            outcome = wait_stream.next() => outcome,
            _ = deadline => {
                log::warn!("container {} exceeded {}s", container_id, timeout_seconds);
                return Err(CortexError::ExecutionTimeout { timeout: timeout_seconds });
            }
        };

        let exit_code = match wait_outcome {
            Some(Ok(response)) => response.status_code,
            // bollard reports a non-zero exit as an error carrying the code
            Some(Err(BollardError::DockerContainerWaitError { code, .. })) => code,
            Some(Err(e)) => return Err(e.into()),
            None => {
                return Err(CortexError::ContainerError(
                    "container wait stream ended unexpectedly".to_string(),
                ))
            }
        };

        let output = self.collect_logs(container_id).await?;

        Ok(ProcessOutput {
            exit_code: exit_code as i32,
            stdout: output,
            stderr: String::new(),
        })
    }

    async fn collect_logs(&self, container_id: &str) -> Result<String, CortexError> {
        let mut logs = self.docker.logs(
            container_id,
            Some(LogsOptions {
                stdout: true,
                stderr: true,
                ..Default::default()
            }),
        );

        let limit = self.config.max_output_bytes;
        let mut kept = Vec::new();
        let mut truncated = false;

        while let Some(entry) = logs.next().await {
            let message = match entry? {
                LogOutput::StdOut { message }
                | LogOutput::StdErr { message }
                | LogOutput::Console { message } => message,
                LogOutput::StdIn { .. } => continue,
            };
            let room = limit.saturating_sub(kept.len());
            if message.len() > room {
                truncated = true;
            }
            kept.extend_from_slice(&message[..message.len().min(room)]);
        }

        Ok(finish_output(&kept, truncated))
    }

    async fn remove(&self, container_id: &str) {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        if let Err(e) = self
            .docker
            .remove_container(container_id, Some(options))
            .await
        {
            log::warn!("failed to remove container {}: {}", container_id, e);
        }
    }
}
