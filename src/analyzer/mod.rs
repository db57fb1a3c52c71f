// Analyzer module - static risk analysis and the LLM backend

pub mod code_analyzer;
pub mod llm_client;
pub mod prompts;

pub use code_analyzer::CodeAnalyzer;
pub use llm_client::{LlmConfig, LlmProvider, OllamaClient, DEFAULT_OLLAMA_URL};
pub use prompts::PromptTemplate;
