use cortex::settings::{Settings, MODEL_ENV, NO_DOCKER_ENV};
use std::collections::HashMap;

#[test]
fn partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{"model": "llama3", "sandbox": {"use_container": false}}"#,
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(settings.model, "llama3");
    assert!(!settings.sandbox.use_container);
    assert_eq!(settings.sandbox.container_image, "python:3.9-slim");
    assert_eq!(settings.temperature, 0.7);
    assert_eq!(settings.execution_timeout, 30);
}

#[test]
fn save_then_load_preserves_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        model: "mistral".to_string(),
        save_history: true,
        system_prompt: Some("be brief".to_string()),
        ..Settings::default()
    };
    settings.save(&path).unwrap();

    let loaded = Settings::load(Some(&path)).unwrap();
    assert_eq!(loaded.system_prompt.as_deref(), Some("be brief"));
    assert!(loaded.save_history);
}

#[test]
fn env_overrides_apply_on_top_of_file_values() {
    let env: HashMap<&str, String> = [
        (MODEL_ENV, "phi".to_string()),
        (NO_DOCKER_ENV, "yes".to_string()),
    ]
    .into_iter()
    .collect();

    let settings = Settings {
        model: "llama3".to_string(),
        ..Settings::default()
    }
    .apply_overrides(|key| env.get(key).cloned());

    assert_eq!(settings.model, "phi");
    assert!(!settings.sandbox.use_container);
}

#[test]
fn blank_overrides_are_ignored() {
    let settings = Settings::default().apply_overrides(|key| {
        (key == MODEL_ENV).then(|| "   ".to_string())
    });

    assert_eq!(settings.model, "qwen");
}

#[test]
fn default_path_lives_under_cortex_dir() {
    if let Some(path) = Settings::default_path() {
        assert!(path.ends_with("cortex/settings.json"));
    }
}
