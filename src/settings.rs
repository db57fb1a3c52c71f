use crate::analyzer::DEFAULT_OLLAMA_URL;
use crate::error::CortexError;
use crate::executor::SandboxConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CORTEX_CONFIG";
pub const MODEL_ENV: &str = "CORTEX_MODEL";
pub const OLLAMA_URL_ENV: &str = "CORTEX_OLLAMA_URL";
pub const TIMEOUT_ENV: &str = "CORTEX_TIMEOUT";
pub const NO_DOCKER_ENV: &str = "CORTEX_NO_DOCKER";

/// User settings. Missing keys in the JSON file fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub ollama_url: String,
    pub system_prompt: Option<String>,
    pub save_history: bool,
    pub history_file: PathBuf,
    pub output_dir: PathBuf,
    pub request_timeout: u64,
    pub execution_timeout: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub sandbox: SandboxConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: "qwen".to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            system_prompt: None,
            save_history: false,
            history_file: PathBuf::from("chat_history.txt"),
            output_dir: PathBuf::from("output"),
            request_timeout: 60,
            execution_timeout: 30,
            max_tokens: 2048,
            temperature: 0.7,
            sandbox: SandboxConfig::default(),
        }
    }
}

impl Settings {
    /// `<config_dir>/cortex/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cortex").join("settings.json"))
    }

    /// Resolution order: explicit path, `$CORTEX_CONFIG`, default location.
    /// Only an explicitly named file is required to exist.
    pub fn resolve_path(explicit: Option<&Path>) -> (Option<PathBuf>, bool) {
        if let Some(path) = explicit {
            return (Some(path.to_path_buf()), true);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return (Some(PathBuf::from(path)), false);
            }
        }
        (Self::default_path(), false)
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self, CortexError> {
        let (path, required) = Self::resolve_path(explicit);

        let settings = match path {
            Some(ref path) if path.exists() => Self::from_file(path)?,
            Some(ref path) if required => {
                return Err(CortexError::ConfigError(format!(
                    "settings file not found: {}",
                    path.display()
                )))
            }
            _ => Self::default(),
        };

        let settings = settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, CortexError> {
        log::debug!("loading settings from {}", path.display());
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            CortexError::ConfigError(format!("{}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), CortexError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Applies `CORTEX_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            self.model = model.trim().to_string();
        }

        if let Some(url) = lookup(OLLAMA_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.ollama_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(timeout) if timeout > 0 => self.execution_timeout = timeout,
                _ => log::warn!("ignoring invalid {}={:?}", TIMEOUT_ENV, raw),
            }
        }

        if let Some(raw) = lookup(NO_DOCKER_ENV) {
            if is_truthy(&raw) {
                self.sandbox.use_container = false;
            }
        }

        self
    }

    pub fn validate(&self) -> Result<(), CortexError> {
        if self.model.trim().is_empty() {
            return Err(CortexError::ConfigError("model cannot be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(CortexError::ConfigError(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.request_timeout == 0 || self.execution_timeout == 0 {
            return Err(CortexError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
