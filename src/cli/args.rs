use crate::analyzer::PromptTemplate;
use crate::error::CortexError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cortex")]
#[command(about = "Terminal chat for local Ollama models with a sandboxed code runner")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Enable debug output including HTTP and process details
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Settings file (defaults to $CORTEX_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a snippet, confirm if risky, then execute it in the sandbox
    Run(RunArgs),
    /// Static risk analysis only; nothing is executed
    Analyze(AnalyzeArgs),
    /// Send a single prompt to the model and print the answer
    Ask(AskArgs),
    /// Interactive chat session
    Chat(ChatArgs),
    /// List models installed in Ollama and the known aliases
    Models,
    /// Download a model into Ollama by alias or full tag
    Install {
        /// Alias (see `cortex models`) or full Ollama tag
        model: String,
    },
    /// List system prompt presets
    Presets,
    /// Print effective settings
    Settings {
        /// Print only the settings file location
        #[arg(long)]
        path: bool,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source file, or '-' for stdin
    pub input: String,

    /// Override language detection (python, bash, javascript, ...)
    #[arg(short = 'l', long)]
    pub lang: Option<String>,

    /// Wall-clock limit in seconds
    #[arg(short = 't', long, value_parser = validate_timeout)]
    pub timeout: Option<u64>,

    /// Run without asking even if risks are found
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Never use the container runtime
    #[arg(long)]
    pub no_container: bool,

    /// Emit the analysis and result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Source file, or '-' for stdin
    pub input: String,

    #[arg(short = 'l', long)]
    pub lang: Option<String>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Prompt text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub prompt: Vec<String>,

    /// Model alias or full Ollama tag
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    #[arg(long, value_parser = validate_temperature)]
    pub temperature: Option<f32>,

    /// System prompt preset (see `cortex presets`)
    #[arg(short = 'p', long)]
    pub preset: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    #[arg(short = 'p', long)]
    pub preset: Option<String>,

    #[arg(long, value_parser = validate_temperature)]
    pub temperature: Option<f32>,

    /// Append every exchange to the history file
    #[arg(long)]
    pub save_history: bool,

    /// Save code blocks from every answer into DIR (default: output_dir setting)
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    pub auto_save: Option<Option<PathBuf>>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Checks that clap cannot express on its own.
    pub fn validate(&self) -> Result<(), CortexError> {
        let preset = match self.command {
            Command::Ask(ref args) => args.preset.as_deref(),
            Command::Chat(ref args) => args.preset.as_deref(),
            _ => None,
        };
        if let Some(name) = preset {
            PromptTemplate::system_prompt(name)?;
        }

        if let Command::Ask(ref args) = self.command {
            if args.prompt_text().trim().is_empty() {
                return Err(CortexError::InvalidArguments(
                    "prompt cannot be empty".to_string(),
                ));
            }
        }

        if let Command::Install { ref model } = self.command {
            if model.trim().is_empty() {
                return Err(CortexError::InvalidArguments(
                    "model name cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else if self.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        }
    }

    pub fn should_use_color(&self) -> bool {
        std::env::var("NO_COLOR").is_err()
    }
}

impl AskArgs {
    pub fn prompt_text(&self) -> String {
        self.prompt.join(" ")
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.parse().map_err(|_| "Timeout must be a number")?;

    if (1..=3600).contains(&timeout) {
        Ok(timeout)
    } else {
        Err("Timeout must be between 1 and 3600 seconds".to_string())
    }
}

fn validate_temperature(s: &str) -> Result<f32, String> {
    let temperature: f32 = s.parse().map_err(|_| "Temperature must be a number")?;

    if (0.0..=2.0).contains(&temperature) {
        Ok(temperature)
    } else {
        Err("Temperature must be between 0.0 and 2.0".to_string())
    }
}
