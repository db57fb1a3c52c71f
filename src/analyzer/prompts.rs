use crate::error::CortexError;

/// Short names accepted by `--model`, mapped to Ollama model tags.
pub const MODEL_ALIASES: &[(&str, &str)] = &[
    ("qwen", "qwen3:latest"),
    ("deepseek", "deepseek-coder:33b"),
    ("deepseek-v2", "deepseek-coder-v2:latest"),
    ("codellama", "codellama:latest"),
    ("llama2", "llama2:latest"),
    ("llama3", "llama3.2:latest"),
    ("qwen2.5", "qwen2.5-coder:latest"),
    ("qwen2.5-32b", "qwen2.5-coder:32b"),
    ("deepseek-r1", "deepseek-r1:latest"),
    ("mistral", "mistral:7b"),
    ("neural-chat", "neural-chat:7b"),
    ("phi", "phi:2.7b"),
    ("gemma", "gemma:2b"),
];

pub const SYSTEM_PRESETS: &[(&str, &str)] = &[
    (
        "python_expert",
        "You are an experienced Python developer. Explain your code examples clearly and follow best practices.",
    ),
    (
        "security_expert",
        "You are a cybersecurity specialist. Analyze security weaknesses and propose safe solutions.",
    ),
    (
        "translator",
        "You are a professional translator. Translate the given text accurately and naturally.",
    ),
    (
        "code_reviewer",
        "You are an experienced code reviewer. Evaluate code quality, security and performance.",
    ),
    (
        "teacher",
        "You are a patient teacher. Explain complex topics in simple, clear terms.",
    ),
    (
        "debugger",
        "You are a debugging expert. Analyze errors and suggest fixes.",
    ),
];

pub struct PromptTemplate;

impl PromptTemplate {
    /// Full model tag for an alias; unknown names pass through untouched.
    pub fn resolve_model(alias: &str) -> String {
        let key = alias.trim().to_lowercase();
        MODEL_ALIASES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, tag)| tag.to_string())
            .unwrap_or_else(|| alias.trim().to_string())
    }

    pub fn system_prompt(preset: &str) -> Result<&'static str, CortexError> {
        SYSTEM_PRESETS
            .iter()
            .find(|(name, _)| *name == preset)
            .map(|(_, prompt)| *prompt)
            .ok_or_else(|| CortexError::UnknownPreset(preset.to_string()))
    }

    pub fn preset_names() -> Vec<&'static str> {
        SYSTEM_PRESETS.iter().map(|(name, _)| *name).collect()
    }

    /// Prompt used by `/read`: the file body fenced and followed by the question.
    pub fn build_file_prompt(filename: &str, content: &str, question: &str) -> String {
        let language = filename.rsplit('.').next().unwrap_or("");
        format!(
            "File: {}\n\n```{}\n{}\n```\n\n{}",
            filename,
            language,
            content.trim_end(),
            question
        )
    }
}
