use crate::models::Language;
use std::path::Path;

pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect_from_extension(filename: &str) -> Option<Language> {
        let path = Path::new(filename);
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("py") | Some("pyw") => Some(Language::Python),
            Some("js") | Some("mjs") | Some("cjs") => Some(Language::Javascript),
            Some("sh") | Some("bash") => Some(Language::Bash),
            _ => None,
        }
    }

    pub fn detect_from_shebang(content: &str) -> Option<Language> {
        let first_line = content.lines().next()?.trim();
        let interpreter_line = first_line.strip_prefix("#!")?;

        let mut parts = interpreter_line.split_whitespace();
        let program = parts.next()?;
        let program_name = Path::new(program)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(program);

        // `#!/usr/bin/env python3` names the real interpreter in the argument
        let interpreter = if program_name == "env" {
            parts.find(|arg| !arg.starts_with('-'))?
        } else {
            program_name
        };

        match interpreter {
            name if name.starts_with("python") => Some(Language::Python),
            "node" | "nodejs" => Some(Language::Javascript),
            "bash" | "sh" | "zsh" | "dash" => Some(Language::Bash),
            _ => None,
        }
    }

    /// Priority: explicit tag, then file extension, then shebang line.
    /// A file nothing recognises keeps its extension as an `Other` tag, so it
    /// is reported as unsupported rather than run by the wrong interpreter.
    /// Bare snippets (stdin, chat blocks) fall back to python.
    pub fn detect_language(
        &self,
        content: &str,
        cli_override: Option<&str>,
        filename: Option<&str>,
    ) -> Language {
        if let Some(tag) = cli_override {
            return Language::parse(tag);
        }

        if let Some(lang) = filename.and_then(Self::detect_from_extension) {
            return lang;
        }

        if let Some(lang) = Self::detect_from_shebang(content) {
            return lang;
        }

        match filename {
            Some(name) => {
                let extension = Path::new(name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("unknown");
                Language::Other(extension.to_string())
            }
            None => Language::Python,
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}
