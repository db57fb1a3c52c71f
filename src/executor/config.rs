use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A concrete command the local runner spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub target_command: String,
    pub target_args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env_vars: HashMap<String, String>,
    pub timeout_seconds: u64,
}

impl ExecutionConfig {
    pub fn new(target_command: String, target_args: Vec<String>, timeout_seconds: u64) -> Self {
        Self {
            target_command,
            target_args,
            working_dir: None,
            env_vars: HashMap::new(),
            timeout_seconds,
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    pub fn with_env_var(mut self, key: &str, value: &str) -> Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn command_line(&self) -> String {
        let mut cmd = self.target_command.clone();
        for arg in &self.target_args {
            cmd.push(' ');
            if arg.contains(' ') {
                cmd.push_str(&format!("\"{}\"", arg));
            } else {
                cmd.push_str(arg);
            }
        }
        cmd
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.target_command.is_empty() {
            return Err("Target command cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Executor-wide settings: which interpreters to use locally and the
/// resource limits applied to the container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub use_container: bool,
    pub container_image: String,
    pub memory_limit_bytes: i64,
    pub cpu_period: i64,
    pub cpu_quota: i64,
    pub python_interpreter: String,
    pub shell: String,
    pub max_output_bytes: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            use_container: true,
            container_image: "python:3.9-slim".to_string(),
            memory_limit_bytes: 100 * 1024 * 1024,
            cpu_period: 100_000,
            cpu_quota: 25_000,
            python_interpreter: "python3".to_string(),
            shell: "bash".to_string(),
            max_output_bytes: 1024 * 1024,
        }
    }
}

impl SandboxConfig {
    /// Local subprocesses only; the container runtime is never probed.
    pub fn local_only() -> Self {
        Self {
            use_container: false,
            ..Self::default()
        }
    }

    pub fn with_container(mut self, enabled: bool) -> Self {
        self.use_container = enabled;
        self
    }

    pub fn with_python_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.python_interpreter = interpreter.into();
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn cpu_percent(&self) -> f64 {
        if self.cpu_period <= 0 {
            return 0.0;
        }
        self.cpu_quota as f64 / self.cpu_period as f64 * 100.0
    }
}
