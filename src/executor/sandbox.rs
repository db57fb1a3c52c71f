use crate::analyzer::CodeAnalyzer;
use crate::error::CortexError;
use crate::executor::container::ContainerRunner;
use crate::executor::runner::{ProcessOutput, ScriptRunner};
use crate::executor::{ExecutionConfig, SandboxConfig};
use crate::models::{
    AnalysisReport, ExecutionDecision, ExecutionResult, ExecutionStatus, ExecutionStrategy,
    Language,
};
use std::io::Write;
use std::time::Instant;

/// Consulted before running a snippet the analyzer flagged.
pub trait ConfirmationGate: Send + Sync {
    fn confirm(&self, report: &AnalysisReport) -> ExecutionDecision;
}

/// Refuses every risky snippet. Installed unless the caller supplies a gate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyRisky;

impl ConfirmationGate for DenyRisky {
    fn confirm(&self, report: &AnalysisReport) -> ExecutionDecision {
        log::info!(
            "declining {} snippet with {} risk(s)",
            report.language,
            report.security_risks.len()
        );
        ExecutionDecision::decline()
    }
}

/// Proceeds regardless of findings (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

impl ConfirmationGate for AutoApprove {
    fn confirm(&self, _report: &AnalysisReport) -> ExecutionDecision {
        ExecutionDecision::proceed()
    }
}

pub struct SandboxedExecutor {
    config: SandboxConfig,
    analyzer: CodeAnalyzer,
    container: Option<ContainerRunner>,
    gate: Box<dyn ConfirmationGate>,
}

impl SandboxedExecutor {
    /// Probes the container runtime once. An unreachable daemon means local
    /// execution for the lifetime of this executor.
    pub async fn new(config: SandboxConfig) -> Self {
        let container = if config.use_container {
            match ContainerRunner::connect(config.clone()).await {
                Ok(runner) => Some(runner),
                Err(e) => {
                    log::warn!("container runtime unavailable, falling back to local: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            config,
            analyzer: CodeAnalyzer::new(),
            container,
            gate: Box::new(DenyRisky),
        }
    }

    /// Local-only executor; never touches the container runtime.
    pub fn local(config: SandboxConfig) -> Self {
        Self {
            config: config.with_container(false),
            analyzer: CodeAnalyzer::new(),
            container: None,
            gate: Box::new(DenyRisky),
        }
    }

    pub fn with_gate(mut self, gate: impl ConfirmationGate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    pub fn container_available(&self) -> bool {
        self.container.is_some()
    }

    pub fn analyze(&self, source: &str, language: &str) -> AnalysisReport {
        self.analyzer.analyze(source, language)
    }

    pub fn strategy_for(&self, language: &Language) -> ExecutionStrategy {
        match language {
            Language::Python if self.container.is_some() => ExecutionStrategy::Container,
            Language::Python | Language::Bash => ExecutionStrategy::Local,
            _ => ExecutionStrategy::None,
        }
    }

    /// Analyze, confirm, run. Every failure comes back as data.
    pub async fn execute(
        &self,
        source: &str,
        language: &str,
        timeout_seconds: u64,
    ) -> ExecutionResult {
        let report = self.analyze(source, language);
        self.execute_analyzed(source, language, &report, timeout_seconds)
            .await
    }

    /// Same as `execute` for callers that already hold the report.
    pub async fn execute_analyzed(
        &self,
        source: &str,
        language: &str,
        report: &AnalysisReport,
        timeout_seconds: u64,
    ) -> ExecutionResult {
        let started = Instant::now();

        if report.has_risks() && !self.gate.confirm(report).proceed {
            return ExecutionResult::not_run(
                language,
                ExecutionStatus::Cancelled,
                CortexError::ExecutionCancelled.to_string(),
            );
        }

        if timeout_seconds == 0 {
            return ExecutionResult::not_run(
                language,
                ExecutionStatus::Failed,
                "Timeout must be greater than 0".to_string(),
            );
        }

        let parsed = Language::parse(language);
        let strategy = self.strategy_for(&parsed);
        if strategy == ExecutionStrategy::None {
            return ExecutionResult::not_run(
                language,
                ExecutionStatus::Unsupported,
                CortexError::UnsupportedLanguage(language.to_string()).to_string(),
            );
        }

        log::debug!(
            "executing {} snippet via {} strategy",
            parsed,
            strategy.as_str()
        );

        let outcome = match strategy {
            ExecutionStrategy::Container => self.run_in_container(source, timeout_seconds).await,
            _ => self.run_locally(source, &parsed, timeout_seconds).await,
        };
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok(output) => {
                let error = match strategy {
                    ExecutionStrategy::Container if output.exit_code != 0 => {
                        format!("Exit code: {}", output.exit_code)
                    }
                    _ => output.stderr,
                };
                ExecutionResult::completed(
                    language,
                    strategy,
                    output.exit_code,
                    output.stdout,
                    error,
                    elapsed,
                )
            }
            Err(e) => {
                let status = match e {
                    CortexError::ExecutionTimeout { .. } => ExecutionStatus::TimedOut,
                    _ => ExecutionStatus::Failed,
                };
                ExecutionResult::not_run(language, status, e.to_string())
                    .with_strategy(strategy)
                    .with_elapsed(elapsed)
            }
        }
    }

    async fn run_in_container(
        &self,
        source: &str,
        timeout_seconds: u64,
    ) -> Result<ProcessOutput, CortexError> {
        match self.container {
            Some(ref runner) => runner.run_python(source, timeout_seconds).await,
            None => Err(CortexError::ContainerError(
                "container runtime not available".to_string(),
            )),
        }
    }

    async fn run_locally(
        &self,
        source: &str,
        language: &Language,
        timeout_seconds: u64,
    ) -> Result<ProcessOutput, CortexError> {
        match language {
            Language::Python => {
                // The whole directory goes away when `workdir` drops
                let workdir = tempfile::Builder::new().prefix("cortex-").tempdir()?;
                let script_path = workdir.path().join("snippet.py");
                let mut script = std::fs::File::create(&script_path)?;
                script.write_all(source.as_bytes())?;
                script.flush()?;
                drop(script);

                let config = ExecutionConfig::new(
                    self.config.python_interpreter.clone(),
                    vec![script_path.to_string_lossy().into_owned()],
                    timeout_seconds,
                )
                .with_working_dir(workdir.path().to_path_buf())
                .with_env_var("PYTHONDONTWRITEBYTECODE", "1")
                .with_env_var("PYTHONUNBUFFERED", "1");

                ScriptRunner::new(config)
                    .with_output_limit(self.config.max_output_bytes)
                    .run()
                    .await
            }
            Language::Bash => {
                let config = ExecutionConfig::new(
                    self.config.shell.clone(),
                    vec!["-c".to_string(), source.to_string()],
                    timeout_seconds,
                );

                ScriptRunner::new(config)
                    .with_output_limit(self.config.max_output_bytes)
                    .run()
                    .await
            }
            other => Err(CortexError::UnsupportedLanguage(other.to_string())),
        }
    }
}
