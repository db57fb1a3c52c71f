use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ```lang\n ... ``` with the tag optional
static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:(\w+)\n)?(.*?)```").expect("fence pattern is valid"));

const DEFAULT_FILENAMES: &[(&str, &str)] = &[
    ("python", "script.py"),
    ("javascript", "script.js"),
    ("html", "index.html"),
    ("css", "style.css"),
    ("json", "config.json"),
    ("yaml", "config.yaml"),
    ("bash", "script.sh"),
    ("sql", "query.sql"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// Fenced code blocks in a model answer, in order. Blank blocks are skipped.
pub fn extract_code_blocks(response: &str) -> Vec<CodeBlock> {
    FENCE
        .captures_iter(response)
        .filter_map(|caps| {
            let code = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            if code.is_empty() {
                return None;
            }
            let language = caps
                .get(1)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_else(|| "text".to_string());
            Some(CodeBlock {
                language,
                code: code.to_string(),
            })
        })
        .collect()
}

/// Names a file after the first class or function it defines, falling back
/// to a per-language default.
pub fn suggest_filename(language: &str, content: &str) -> String {
    let language = language.to_lowercase();
    let default = DEFAULT_FILENAMES
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, name)| *name);
    let extension = default
        .and_then(|name| name.rsplit('.').next())
        .unwrap_or("py");

    for line in content.lines().map(str::trim) {
        let name = if let Some(rest) = line.strip_prefix("class ") {
            rest.split(|c| c == '(' || c == ':' || c == '{' || c == ' ').next()
        } else if let Some(rest) = line.strip_prefix("def ") {
            rest.split('(').next()
        } else {
            None
        };

        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            return format!("{}.{}", name.to_lowercase(), extension);
        }
    }

    default.unwrap_or("output.txt").to_string()
}
