use crate::error::CortexError;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only plain-text chat log.
pub struct ChatHistory {
    path: PathBuf,
}

impl ChatHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, prompt: &str, response: &str, model: &str) -> Result<(), CortexError> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let entry = format_entry(&timestamp, prompt, response, model);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        Ok(())
    }
}

pub(crate) fn format_entry(timestamp: &str, prompt: &str, response: &str, model: &str) -> String {
    format!(
        "=== {} (Model: {}) ===\nYou: {}\nAssistant: {}\n{}\n\n",
        timestamp,
        model,
        prompt,
        response,
        "-".repeat(50)
    )
}
