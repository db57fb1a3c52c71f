// Session module - chat state between REPL turns

pub mod blocks;
pub mod files;
pub mod history;

pub use blocks::{extract_code_blocks, suggest_filename, CodeBlock};
pub use files::{list_project_files, write_file, ProjectFile, LIST_LIMIT};
pub use history::ChatHistory;

use crate::analyzer::LlmProvider;
use crate::error::CortexError;
use std::path::{Path, PathBuf};

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Exit,
    Help,
    Blocks,
    /// 1-based block index; `None` means the first block.
    Run(Option<usize>),
    Analyze(Option<usize>),
    Read(String),
    Write { path: String, content: String },
    /// Directory to list; `None` means the working directory.
    List(Option<String>),
    /// Save the latest code blocks; `None` means the configured output dir.
    Save(Option<String>),
    Prompt(String),
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }

        match line.to_lowercase().as_str() {
            "exit" | "quit" | "q" => return ReplCommand::Exit,
            _ => {}
        }

        let rest = match line.strip_prefix('/') {
            Some(rest) => rest,
            None => return ReplCommand::Prompt(line.to_string()),
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        match name {
            "help" => ReplCommand::Help,
            "blocks" => ReplCommand::Blocks,
            "run" | "analyze" => match parse_index(argument) {
                Ok(index) if name == "run" => ReplCommand::Run(index),
                Ok(index) => ReplCommand::Analyze(index),
                Err(()) => ReplCommand::Unknown(line.to_string()),
            },
            "read" if !argument.is_empty() => ReplCommand::Read(argument.to_string()),
            "write" => match argument.split_once(char::is_whitespace) {
                Some((path, content)) if !content.trim().is_empty() => ReplCommand::Write {
                    path: path.to_string(),
                    content: content.trim().to_string(),
                },
                _ => ReplCommand::Unknown(line.to_string()),
            },
            "list" => ReplCommand::List(optional_argument(argument)),
            "save" => ReplCommand::Save(optional_argument(argument)),
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

fn optional_argument(argument: &str) -> Option<String> {
    (!argument.is_empty()).then(|| argument.to_string())
}

fn parse_index(argument: &str) -> Result<Option<usize>, ()> {
    if argument.is_empty() {
        return Ok(None);
    }
    match argument.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(()),
    }
}

/// Conversation context: the backend, optional system prompt, the code
/// blocks of the latest answer, and where to persist things.
pub struct ChatSession {
    llm: Box<dyn LlmProvider>,
    system_prompt: Option<String>,
    history: Option<ChatHistory>,
    auto_save_dir: Option<PathBuf>,
    last_blocks: Vec<CodeBlock>,
    turns: usize,
}

impl ChatSession {
    pub fn new(llm: Box<dyn LlmProvider>) -> Self {
        Self {
            llm,
            system_prompt: None,
            history: None,
            auto_save_dir: None,
            last_blocks: Vec::new(),
            turns: 0,
        }
    }

    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    pub fn with_history(mut self, history: ChatHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_auto_save(mut self, dir: PathBuf) -> Self {
        self.auto_save_dir = Some(dir);
        self
    }

    pub fn model_name(&self) -> &str {
        self.llm.get_model_name()
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn blocks(&self) -> &[CodeBlock] {
        &self.last_blocks
    }

    pub fn block(&self, index: Option<usize>) -> Option<&CodeBlock> {
        let position = index.unwrap_or(1).checked_sub(1)?;
        self.last_blocks.get(position)
    }

    /// Sends one prompt. History and auto-save failures are logged, not fatal.
    pub async fn send(&mut self, prompt: &str) -> Result<String, CortexError> {
        let response = self
            .llm
            .generate(prompt, self.system_prompt.as_deref())
            .await?;

        self.turns += 1;
        self.last_blocks = extract_code_blocks(&response);

        if let Some(ref history) = self.history {
            if let Err(e) = history.append(prompt, &response, self.llm.get_model_name()) {
                log::warn!("could not write history to {}: {}", history.path().display(), e);
            }
        }

        if let Some(dir) = self.auto_save_dir.clone() {
            if !self.last_blocks.is_empty() {
                match self.save_blocks(&dir) {
                    Ok(paths) => log::info!("saved {} code block(s) to {}", paths.len(), dir.display()),
                    Err(e) => log::warn!("auto-save to {} failed: {}", dir.display(), e),
                }
            }
        }

        Ok(response)
    }

    /// Writes every block of the latest answer into `dir` without
    /// overwriting existing files.
    pub fn save_blocks(&self, dir: &Path) -> Result<Vec<PathBuf>, CortexError> {
        std::fs::create_dir_all(dir)?;

        let mut saved = Vec::with_capacity(self.last_blocks.len());
        for block in &self.last_blocks {
            let path = unique_path(dir, &suggest_filename(&block.language, &block.code));
            std::fs::write(&path, format!("{}\n", block.code))?;
            saved.push(path);
        }
        Ok(saved)
    }
}

fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, extension)) => (stem, format!(".{}", extension)),
        None => (filename, String::new()),
    };

    (1..)
        .map(|n| dir.join(format!("{}_{}{}", stem, n, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
