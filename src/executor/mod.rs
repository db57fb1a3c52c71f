// Executor module - strategy selection and sandboxed runs

pub mod config;
pub mod container;
pub mod runner;
pub mod sandbox;

pub use config::{ExecutionConfig, SandboxConfig};
pub use container::ContainerRunner;
pub use runner::{ProcessOutput, ScriptRunner};
pub use sandbox::{AutoApprove, ConfirmationGate, DenyRisky, SandboxedExecutor};
