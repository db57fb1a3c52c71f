use cortex::executor::{ExecutionConfig, ScriptRunner};
use cortex::settings::Settings;
use cortex::CortexError;

#[test]
fn error_messages_are_user_facing() {
    assert_eq!(
        CortexError::UnsupportedLanguage("ruby".to_string()).to_string(),
        "Unsupported language: ruby"
    );
    assert_eq!(
        CortexError::ExecutionTimeout { timeout: 30 }.to_string(),
        "Execution timeout (30s)"
    );
    assert_eq!(
        CortexError::ExecutionCancelled.to_string(),
        "Execution cancelled by user"
    );
}

#[test]
fn exit_codes_follow_error_class() {
    assert_eq!(CortexError::UnknownPreset("x".to_string()).exit_code(), 2);
    assert_eq!(
        CortexError::OllamaUnavailable {
            url: "http://localhost:11434".to_string()
        }
        .exit_code(),
        5
    );
    assert_eq!(CortexError::ModelNotInstalled("phi".to_string()).exit_code(), 5);
    assert_eq!(CortexError::ConfigError("bad".to_string()).exit_code(), 1);
}

#[test]
fn io_errors_convert() {
    fn read_missing() -> Result<String, CortexError> {
        Ok(std::fs::read_to_string("/definitely/not/here.py")?)
    }

    assert!(matches!(read_missing(), Err(CortexError::IoError(_))));
}

#[tokio::test]
async fn runner_rejects_empty_command() {
    let runner = ScriptRunner::new(ExecutionConfig::new(String::new(), vec![], 5));

    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, CortexError::InvalidArguments(_)));
}

#[test]
fn explicit_missing_settings_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let err = Settings::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, CortexError::ConfigError(_)));
}

#[test]
fn malformed_settings_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Settings::from_file(&path).unwrap_err();
    assert!(matches!(err, CortexError::ConfigError(_)));
}
