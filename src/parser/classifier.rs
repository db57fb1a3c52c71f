use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Python modules whose import is reported. Matched on the root package so
/// `os.path` and `from os import path` are both caught.
pub const DANGEROUS_PYTHON_MODULES: &[&str] = &[
    "os", "subprocess", "sys", "shutil", "glob", "pathlib", "tempfile", "pickle", "marshal",
    "ctypes", "socket", "urllib", "requests", "ftplib", "smtplib",
];

pub const DANGEROUS_PYTHON_FUNCTIONS: &[&str] = &[
    "eval", "exec", "compile", "input", "open", "file", "raw_input", "__import__",
];

pub const DANGEROUS_JAVASCRIPT_PATTERNS: &[&str] = &[
    r"eval\s*\(",
    r"Function\s*\(",
    r"setTimeout\s*\(",
    r"setInterval\s*\(",
    r"fetch\s*\(",
    r"XMLHttpRequest",
    r"localStorage",
    r"sessionStorage",
];

/// Plain substrings, not words: `dd` also matches inside `add`.
pub const DANGEROUS_BASH_COMMANDS: &[&str] = &[
    "rm -rf", "dd", "mkfs", "fdisk", "chmod 777", "sudo", "su", "passwd", "useradd", "userdel",
];

static JAVASCRIPT_RULES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    DANGEROUS_JAVASCRIPT_PATTERNS
        .iter()
        .filter_map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .ok()
                .map(|regex| (*pattern, regex))
        })
        .collect()
});

pub struct SecurityClassifier;

impl SecurityClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn is_dangerous_module(&self, import: &str) -> bool {
        let root = import.split('.').next().unwrap_or(import);
        DANGEROUS_PYTHON_MODULES.contains(&root)
    }

    pub fn is_dangerous_function(&self, name: &str) -> bool {
        DANGEROUS_PYTHON_FUNCTIONS.contains(&name)
    }

    pub fn classify_python(&self, imports: &[String], calls: &[String]) -> Vec<String> {
        let mut risks = Vec::new();

        for import in imports {
            if self.is_dangerous_module(import) {
                risks.push(format!("Dangerous import: {}", import));
            }
        }

        for call in calls {
            if self.is_dangerous_function(call) {
                risks.push(format!("Dangerous function: {}", call));
            }
        }

        risks
    }

    /// One risk per matching pattern, however many times it matches.
    pub fn classify_javascript(&self, source: &str) -> Vec<String> {
        JAVASCRIPT_RULES
            .iter()
            .filter(|(_, regex)| regex.is_match(source))
            .map(|(pattern, _)| format!("Dangerous pattern: {}", pattern))
            .collect()
    }

    pub fn classify_bash(&self, source: &str) -> Vec<String> {
        DANGEROUS_BASH_COMMANDS
            .iter()
            .filter(|command| source.contains(*command))
            .map(|command| format!("Dangerous command: {}", command))
            .collect()
    }
}

impl Default for SecurityClassifier {
    fn default() -> Self {
        Self::new()
    }
}
