use thiserror::Error;

#[derive(Error, Debug)]
pub enum CortexError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No input provided - empty source")]
    NoInput,

    #[error("Execution timeout ({timeout}s)")]
    ExecutionTimeout { timeout: u64 },

    #[error("Execution cancelled by user")]
    ExecutionCancelled,

    #[error("Execution error: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("Docker execution error: {0}")]
    ContainerError(String),

    #[error("Docker error: {0}")]
    DockerError(#[from] bollard::errors::Error),

    #[error("Ollama service is not reachable at {url}")]
    OllamaUnavailable { url: String },

    #[error("Model '{0}' is not installed; pull it with `ollama pull {0}`")]
    ModelNotInstalled(String),

    #[error("LLM request failed: {0}")]
    LlmClientError(String),

    #[error("Unknown system prompt preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CortexError {
    /// Process exit code reported by the `cortex` binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CortexError::InvalidArguments(_) | CortexError::UnknownPreset(_) => 2,
            CortexError::ExecutionCancelled => 3,
            CortexError::ExecutionTimeout { .. } => 4,
            CortexError::OllamaUnavailable { .. }
            | CortexError::ModelNotInstalled(_)
            | CortexError::LlmClientError(_) => 5,
            _ => 1,
        }
    }
}
