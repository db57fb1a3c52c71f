pub mod execution;
pub mod report;
pub mod script;

pub use execution::{ExecutionDecision, ExecutionResult, ExecutionStatus, ExecutionStrategy};
pub use report::{AnalysisReport, Complexity};
pub use script::{Language, Script, ScriptSource};
