pub mod analyzer;
pub mod cli;
pub mod error;
pub mod executor;
pub mod models;
pub mod parser;
pub mod session;
pub mod settings;

pub use error::CortexError;

// Re-export commonly used types
pub use models::{
    AnalysisReport, Complexity, ExecutionDecision, ExecutionResult, ExecutionStatus,
    ExecutionStrategy, Language, Script, ScriptSource,
};

pub use analyzer::CodeAnalyzer;
pub use executor::{ConfirmationGate, SandboxConfig, SandboxedExecutor};
pub use settings::Settings;

pub use cli::CliHandler;
