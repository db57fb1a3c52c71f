use clap::Parser;
use cortex::cli::{Cli, Command};
use std::io::Write;
use std::process::{Command as Process, Output, Stdio};

fn cortex(args: &[&str], stdin: &str) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Process::new(env!("CARGO_BIN_EXE_cortex"))
        .args(args)
        .env("CORTEX_CONFIG", dir.path().join("absent.json"))
        .env("CORTEX_NO_DOCKER", "1")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn cortex binary");

    if let Some(mut input) = child.stdin.take() {
        input.write_all(stdin.as_bytes()).unwrap();
    }

    child.wait_with_output().unwrap()
}

#[test]
fn subcommands_parse() {
    let cli = Cli::try_parse_from(["cortex", "run", "-", "--lang", "bash", "--no-container"]).unwrap();
    assert!(matches!(cli.command, Command::Run(ref args) if args.no_container));

    for argv in [
        vec!["cortex", "analyze", "x.py"],
        vec!["cortex", "ask", "hello"],
        vec!["cortex", "chat", "--save-history", "--auto-save", "out"],
        vec!["cortex", "models"],
        vec!["cortex", "install", "qwen"],
        vec!["cortex", "chat", "--auto-save"],
        vec!["cortex", "presets"],
        vec!["cortex", "settings", "--path"],
    ] {
        assert!(Cli::try_parse_from(&argv).is_ok(), "failed: {:?}", argv);
    }
}

#[test]
fn missing_subcommand_exits_with_argument_error() {
    let output = cortex(&[], "");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn analyze_reports_risks_without_executing() {
    let output = cortex(&["analyze", "-", "--lang", "python"], "import os\nos.remove('x')\n");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dangerous import: os"));
}

#[test]
fn analyze_json_is_machine_readable() {
    let output = cortex(&["analyze", "-", "--lang", "bash", "--json"], "sudo ls\n");

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["language"], "bash");
    assert!(report["security_risks"]
        .as_array()
        .unwrap()
        .iter()
        .any(|risk| risk == "Dangerous command: sudo"));
}

#[test]
fn run_clean_bash_succeeds() {
    let output = cortex(&["run", "-", "--lang", "bash"], "echo from-cortex\n");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("from-cortex"));
}

#[test]
fn run_failing_snippet_exits_one() {
    let output = cortex(&["run", "-", "--lang", "bash", "--json"], "exit 9\n");

    assert_eq!(output.status.code(), Some(1));
    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["result"]["exit_code"], 9);
    assert_eq!(document["result"]["strategy"], "local");
}

#[test]
fn declined_risky_file_exits_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("risky.sh");
    std::fs::write(&script, "echo should-not-run # sudo\n").unwrap();

    let output = cortex(&["run", script.to_str().unwrap()], "no\n");

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dangerous command: sudo"));
    assert!(!stdout.contains("Output\n"));
}

#[test]
fn yes_flag_skips_confirmation() {
    let output = cortex(
        &["run", "-", "--lang", "bash", "--yes", "--json"],
        "echo approved # sudo\n",
    );

    assert_eq!(output.status.code(), Some(0));
    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["result"]["output"], "approved\n");
}

#[test]
fn timeout_exits_four() {
    let output = cortex(&["run", "-", "--lang", "bash", "--timeout", "1"], "sleep 20\n");

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Execution timeout (1s)"));
}

#[test]
fn unrecognised_file_type_is_unsupported_not_run() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("hello.rb");
    std::fs::write(&script, "puts 'hello'\n").unwrap();

    let output = cortex(&["run", script.to_str().unwrap(), "--json"], "");

    assert_eq!(output.status.code(), Some(1));
    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["result"]["status"], "unsupported");
    assert_eq!(document["result"]["error"], "Unsupported language: rb");
    assert_eq!(document["result"]["exit_code"], serde_json::Value::Null);
}

#[test]
fn empty_input_is_rejected() {
    let output = cortex(&["run", "-"], "   \n");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn presets_are_listed() {
    let output = cortex(&["presets"], "");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    for preset in ["python_expert", "security_expert", "debugger"] {
        assert!(stdout.contains(preset));
    }
}

#[test]
fn unknown_preset_is_an_argument_error() {
    let output = cortex(&["ask", "hi", "--preset", "pirate"], "");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn settings_reflect_env_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let output = Process::new(env!("CARGO_BIN_EXE_cortex"))
        .arg("settings")
        .env("CORTEX_CONFIG", dir.path().join("absent.json"))
        .env("CORTEX_MODEL", "gemma")
        .env("CORTEX_NO_DOCKER", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["model"], "gemma");
    assert_eq!(settings["sandbox"]["use_container"], false);
}

#[test]
fn unreachable_ollama_exits_five() {
    let dir = tempfile::tempdir().unwrap();
    let output = Process::new(env!("CARGO_BIN_EXE_cortex"))
        .args(["ask", "hello"])
        .env("CORTEX_CONFIG", dir.path().join("absent.json"))
        .env("CORTEX_OLLAMA_URL", "http://127.0.0.1:9")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
}
