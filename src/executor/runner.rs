use crate::error::CortexError;
use crate::executor::ExecutionConfig;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::{timeout, Duration};

const TRUNCATION_MARKER: &str = "\n[output truncated]";

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Spawns one local process, captures its streams and enforces the deadline.
pub struct ScriptRunner {
    config: ExecutionConfig,
    max_output_bytes: usize,
}

impl ScriptRunner {
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            max_output_bytes: usize::MAX,
        }
    }

    pub fn with_output_limit(mut self, bytes: usize) -> Self {
        self.max_output_bytes = bytes;
        self
    }

    pub async fn run(&self) -> Result<ProcessOutput, CortexError> {
        self.config
            .validate()
            .map_err(CortexError::InvalidArguments)?;

        let mut command = Command::new(&self.config.target_command);
        command.args(&self.config.target_args);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        command.kill_on_drop(true);

        for (key, value) in &self.config.env_vars {
            command.env(key, value);
        }

        if let Some(ref cwd) = self.config.working_dir {
            command.current_dir(cwd);
        }

        // Own process group, so a timeout can take down everything it forked
        #[cfg(unix)]
        command.process_group(0);

        log::debug!("spawning: {}", self.config.command_line());

        let mut child = command.spawn().map_err(|e| CortexError::SpawnFailed {
            command: self.config.target_command.clone(),
            reason: e.to_string(),
        })?;
        let pid = child.id();

        let stdout_task = tokio::spawn(read_stream(child.stdout.take(), self.max_output_bytes));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take(), self.max_output_bytes));

        let timeout_secs = self.config.timeout_seconds;
        let exit_status = match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => {
                kill_process_group(pid);
                stdout_task.abort();
                stderr_task.abort();
                return Err(CortexError::ExecutionFailed(e.to_string()));
            }
            Err(_) => {
                log::warn!(
                    "'{}' exceeded {}s, killing process group",
                    self.config.target_command,
                    timeout_secs
                );
                kill_process_group(pid);
                if let Err(kill_err) = child.start_kill() {
                    log::debug!("start_kill after timeout: {}", kill_err);
                }
                let _ = child.wait().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(CortexError::ExecutionTimeout {
                    timeout: timeout_secs,
                });
            }
        };

        // Background jobs left behind would otherwise hold the pipes open
        kill_process_group(pid);

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(ProcessOutput {
            exit_code: exit_status.code().unwrap_or(1),
            stdout,
            stderr,
        })
    }
}

/// Drains `stream` to EOF, keeping at most `limit` bytes.
async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>, limit: usize) -> String {
    let mut stream = match stream {
        Some(stream) => stream,
        None => return String::new(),
    };

    let mut kept = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                let room = limit.saturating_sub(kept.len());
                if n > room {
                    truncated = true;
                }
                kept.extend_from_slice(&chunk[..n.min(room)]);
            }
            Err(e) => {
                log::debug!("stopped reading child stream: {}", e);
                break;
            }
        }
    }

    finish_output(&kept, truncated)
}

/// Lossy UTF-8 decode, marking output that hit the size cap.
pub(crate) fn finish_output(kept: &[u8], truncated: bool) -> String {
    let mut text = String::from_utf8_lossy(kept).into_owned();
    if truncated {
        text.push_str(TRUNCATION_MARKER);
    }
    text
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = pid {
        // ESRCH just means the group is already gone
        let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
