use cortex::executor::{AutoApprove, SandboxConfig, SandboxedExecutor};
use cortex::{ExecutionStatus, ExecutionStrategy};
use std::process::Command;
use std::time::{Duration, Instant};

fn executor() -> SandboxedExecutor {
    SandboxedExecutor::local(SandboxConfig::default()).with_gate(AutoApprove)
}

fn python_available() -> bool {
    Command::new("python3")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn python_snippet_runs_locally() {
    if !python_available() {
        return;
    }

    let result = executor().execute("print(6 * 7)", "python", 10).await;

    assert!(result.success, "error: {}", result.error);
    assert_eq!(result.output, "42\n");
    assert_eq!(result.exit_code, Some(0));
    assert_eq!(result.strategy, ExecutionStrategy::Local);
    assert_eq!(result.language, "python");
}

#[tokio::test]
async fn python_exception_is_reported_not_raised() {
    if !python_available() {
        return;
    }

    let result = executor().execute("print('before')\n1 / 0\n", "python", 10).await;

    assert!(!result.success);
    assert_eq!(result.exit_code, Some(1));
    assert_eq!(result.output, "before\n");
    assert!(result.error.contains("ZeroDivisionError"));
}

#[tokio::test]
async fn python_temp_directory_is_removed() {
    if !python_available() {
        return;
    }

    let result = executor()
        .execute("import os\nprint(os.getcwd())\n", "python", 10)
        .await;
    assert!(result.success, "error: {}", result.error);

    let workdir = result.output.trim();
    assert!(!workdir.is_empty());
    assert!(!std::path::Path::new(workdir).exists());
}

#[tokio::test]
async fn bash_snippet_runs_through_shell() {
    let result = executor().execute("x=3; echo $((x * 2))", "bash", 10).await;

    assert!(result.success);
    assert_eq!(result.output, "6\n");
}

#[tokio::test]
async fn timeout_kills_whole_process_group() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("leaked");
    let script = format!("(sleep 2; touch '{}') & sleep 30", marker.display());

    let started = Instant::now();
    let result = executor().execute(&script, "bash", 1).await;

    assert_eq!(result.status, ExecutionStatus::TimedOut);
    assert_eq!(result.error, "Execution timeout (1s)");
    assert_eq!(result.exit_code, None);
    assert!(started.elapsed() < Duration::from_secs(10));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!marker.exists(), "background job outlived execute");
}

#[tokio::test]
async fn elapsed_time_is_measured() {
    let result = executor().execute("sleep 1", "bash", 10).await;

    assert!(result.success);
    assert!(result.execution_time_seconds >= 0.9);
    assert!(result.execution_time_seconds < 10.0);
}

#[tokio::test]
async fn non_utf8_output_is_lossy() {
    let result = executor().execute(r"printf 'ok\377'", "bash", 10).await;

    assert!(result.success);
    assert!(result.output.starts_with("ok"));
    assert!(result.output.contains('\u{FFFD}'));
}

#[tokio::test]
async fn javascript_is_unsupported_locally() {
    let result = executor().execute("console.log(1)", "javascript", 10).await;

    assert_eq!(result.status, ExecutionStatus::Unsupported);
    assert_eq!(result.error, "Unsupported language: javascript");
    assert_eq!(result.strategy, ExecutionStrategy::None);
}

#[tokio::test]
async fn empty_source_is_data_not_panic() {
    let result = executor().execute("", "bash", 5).await;

    assert!(result.success);
    assert_eq!(result.output, "");
}

#[tokio::test]
async fn unreachable_container_runtime_falls_back_to_local() {
    std::env::set_var("DOCKER_HOST", "unix:///nonexistent/cortex-test/docker.sock");

    let executor = SandboxedExecutor::new(SandboxConfig::default())
        .await
        .with_gate(AutoApprove);

    assert!(!executor.container_available());

    let result = executor.execute("echo fallback", "bash", 10).await;
    assert!(result.success);
    assert_eq!(result.strategy, ExecutionStrategy::Local);
}

#[tokio::test]
async fn output_is_capped() {
    let config = SandboxConfig {
        max_output_bytes: 16,
        ..SandboxConfig::default()
    };
    let executor = SandboxedExecutor::local(config).with_gate(AutoApprove);

    let result = executor.execute("yes | head -c 10000", "bash", 10).await;

    assert!(result.success);
    assert!(result.output.len() < 100);
    assert!(result.output.ends_with("[output truncated]"));
}
