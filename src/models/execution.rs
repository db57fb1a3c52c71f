use serde::{Deserialize, Serialize};

/// Outcome of one `execute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    pub error: String,
    pub execution_time_seconds: f64,
    /// `None` when no process or container ever ran to completion.
    pub exit_code: Option<i32>,
    pub language: String,
    pub status: ExecutionStatus,
    pub strategy: ExecutionStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Completed,
    TimedOut,
    Failed,
    Cancelled,
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    Container,
    Local,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionDecision {
    pub proceed: bool,
}

impl ExecutionResult {
    /// Result for a process that ran to completion.
    pub fn completed(
        language: &str,
        strategy: ExecutionStrategy,
        exit_code: i32,
        output: String,
        error: String,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            success: exit_code == 0,
            output,
            error,
            execution_time_seconds: elapsed_seconds,
            exit_code: Some(exit_code),
            language: language.to_string(),
            status: ExecutionStatus::Completed,
            strategy,
        }
    }

    /// Result for an attempt that never produced an exit code.
    pub fn not_run(language: &str, status: ExecutionStatus, error: String) -> Self {
        Self {
            success: false,
            output: String::new(),
            error,
            execution_time_seconds: 0.0,
            exit_code: None,
            language: language.to_string(),
            status,
            strategy: ExecutionStrategy::None,
        }
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_elapsed(mut self, seconds: f64) -> Self {
        self.execution_time_seconds = seconds;
        self
    }

    pub fn is_timeout(&self) -> bool {
        self.status == ExecutionStatus::TimedOut
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ExecutionStatus::Cancelled
    }
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Completed => "completed",
            ExecutionStatus::TimedOut => "timed_out",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Cancelled => "cancelled",
            ExecutionStatus::Unsupported => "unsupported",
        }
    }
}

impl ExecutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStrategy::Container => "container",
            ExecutionStrategy::Local => "local",
            ExecutionStrategy::None => "none",
        }
    }
}

impl ExecutionDecision {
    pub fn proceed() -> Self {
        Self { proceed: true }
    }

    pub fn decline() -> Self {
        Self { proceed: false }
    }
}
