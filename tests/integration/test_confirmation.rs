use cortex::cli::UserPrompter;
use cortex::executor::{AutoApprove, ConfirmationGate, SandboxConfig, SandboxedExecutor};
use cortex::{AnalysisReport, ExecutionDecision, ExecutionStatus, ExecutionStrategy};
use std::sync::{Arc, Mutex};

/// Records every report it is shown and answers with a fixed decision.
#[derive(Clone)]
struct RecordingGate {
    proceed: bool,
    seen: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingGate {
    fn new(proceed: bool) -> Self {
        Self {
            proceed,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.seen.lock().unwrap().clone()
    }
}

impl ConfirmationGate for RecordingGate {
    fn confirm(&self, report: &AnalysisReport) -> ExecutionDecision {
        self.seen.lock().unwrap().push(report.security_risks.clone());
        if self.proceed {
            ExecutionDecision::proceed()
        } else {
            ExecutionDecision::decline()
        }
    }
}

#[tokio::test]
async fn clean_code_skips_the_gate() {
    let gate = RecordingGate::new(false);
    let executor = SandboxedExecutor::local(SandboxConfig::default()).with_gate(gate.clone());

    let result = executor.execute("echo clean", "bash", 10).await;

    assert!(result.success);
    assert!(gate.calls().is_empty());
}

#[tokio::test]
async fn declined_gate_has_no_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");
    let script = format!("touch '{}' # needs sudo later", marker.display());

    let gate = RecordingGate::new(false);
    let executor = SandboxedExecutor::local(SandboxConfig::default()).with_gate(gate.clone());
    let result = executor.execute(&script, "bash", 10).await;

    assert_eq!(result.status, ExecutionStatus::Cancelled);
    assert_eq!(result.error, "Execution cancelled by user");
    assert_eq!(result.exit_code, None);
    assert_eq!(result.strategy, ExecutionStrategy::None);
    assert!(!marker.exists());

    let calls = gate.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains(&"Dangerous command: sudo".to_string()));
}

#[tokio::test]
async fn approved_gate_runs_the_snippet() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");
    let script = format!("touch '{}' # sudo", marker.display());

    let gate = RecordingGate::new(true);
    let executor = SandboxedExecutor::local(SandboxConfig::default()).with_gate(gate.clone());
    let result = executor.execute(&script, "bash", 10).await;

    assert!(result.success, "error: {}", result.error);
    assert!(marker.exists());
    assert_eq!(gate.calls().len(), 1);
}

#[tokio::test]
async fn default_gate_never_silently_proceeds() {
    let executor = SandboxedExecutor::local(SandboxConfig::default());

    let result = executor.execute("eval('1')", "python", 10).await;

    assert!(result.is_cancelled());
}

#[tokio::test]
async fn analysis_precedes_execution_for_same_submission() {
    let executor = SandboxedExecutor::local(SandboxConfig::default()).with_gate(AutoApprove);
    let source = "echo one; echo two";

    let report = executor.analyze(source, "bash");
    let result = executor.execute_analyzed(source, "bash", &report, 10).await;

    assert_eq!(report.line_count, 1);
    assert_eq!(result.output, "one\ntwo\n");
}

#[test]
fn prompter_answers() {
    let decide = |answer: &str| UserPrompter::parse_execution_response(answer).map(|d| d.proceed);

    assert_eq!(decide("yes"), Some(true));
    assert_eq!(decide("proceed"), Some(true));
    assert_eq!(decide("NO"), Some(false));
    assert_eq!(decide("abort"), Some(false));
    assert_eq!(decide("later"), None);
}
