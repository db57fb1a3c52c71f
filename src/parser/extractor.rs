use once_cell::sync::Lazy;
use regex::Regex;

// import x from 'mod' | import 'mod' | require("mod") | import("mod")
static JS_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)(?:^\s*import\s+(?:[\w*{}\s,$]+\s+from\s+)?["']([^"']+)["']|\brequire\s*\(\s*["']([^"']+)["']\s*\)|\bimport\s*\(\s*["']([^"']+)["']\s*\))"#,
    )
    .expect("javascript import pattern is valid")
});

// source file.sh | . ./file.sh
static BASH_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(?:source|\.)\s+["']?([^\s"';&|]+)"#)
        .expect("bash source pattern is valid")
});

/// Regex-based dependency extraction for languages without a parser.
pub struct ComponentExtractor;

impl ComponentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn javascript_imports(&self, source: &str) -> Vec<String> {
        JS_IMPORT
            .captures_iter(source)
            .filter_map(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str().to_string())
            })
            .collect()
    }

    pub fn bash_sources(&self, source: &str) -> Vec<String> {
        BASH_SOURCE
            .captures_iter(source)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

impl Default for ComponentExtractor {
    fn default() -> Self {
        Self::new()
    }
}
