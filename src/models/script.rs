use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub content: String,
    pub language: Language,
    pub source: ScriptSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptSource {
    Stdin,
    File(PathBuf),
}

/// Language tag of a snippet. Matching is case-insensitive; unrecognised
/// tags are kept verbatim in `Other` so they can be echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Bash,
    Other(String),
}

impl Language {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "python" | "python3" | "py" => Language::Python,
            "javascript" | "js" | "node" | "nodejs" => Language::Javascript,
            "bash" | "sh" | "shell" => Language::Bash,
            _ => Language::Other(tag.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Bash => "bash",
            Language::Other(tag) => tag,
        }
    }

}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Script {
    pub fn new(content: String, source: ScriptSource) -> Self {
        Self {
            content,
            language: Language::Other("unknown".to_string()),
            source,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
