pub mod args;
pub mod input;
pub mod prompt;
pub mod reporter;

pub use args::{Cli, Command};
pub use prompt::UserPrompter;
pub use reporter::ReportFormatter;

use crate::analyzer::{LlmConfig, OllamaClient, PromptTemplate};
use crate::error::CortexError;
use crate::executor::{AutoApprove, DenyRisky, SandboxedExecutor};
use crate::models::{ExecutionResult, ExecutionStatus, Language, Script, ScriptSource};
use crate::parser::LanguageDetector;
use crate::session::{
    list_project_files, write_file, ChatHistory, ChatSession, CodeBlock, ReplCommand, LIST_LIMIT,
};
use input::{stdin_lines, Line};
use crate::settings::Settings;
use args::{AnalyzeArgs, AskArgs, ChatArgs, RunArgs};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const REPL_HELP: &str = "\
Commands:
  /run [N]       execute code block N (default 1) from the last answer
  /analyze [N]   static analysis of code block N
  /blocks        list code blocks from the last answer
  /read FILE     send a file to the model
  /write FILE TEXT
                 write TEXT to FILE
  /list [DIR]    list project files (hidden and __pycache__ skipped)
  /save [DIR]    save code blocks from the last answer (default: output dir)
  /help          show this help
  exit, quit, q  leave the chat";

pub struct CliHandler {
    cli: Cli,
    settings: Settings,
}

impl CliHandler {
    pub fn new(cli: Cli, settings: Settings) -> Self {
        Self { cli, settings }
    }

    fn formatter(&self) -> ReportFormatter {
        ReportFormatter::new(self.cli.should_use_color(), self.cli.is_verbose())
    }

    pub async fn run(&self) -> Result<i32, CortexError> {
        match self.cli.command {
            Command::Run(ref args) => self.run_snippet(args).await,
            Command::Analyze(ref args) => self.analyze_snippet(args),
            Command::Ask(ref args) => self.ask(args).await,
            Command::Chat(ref args) => self.chat(args).await,
            Command::Models => self.list_models().await,
            Command::Install { ref model } => self.install_model(model).await,
            Command::Presets => Ok(self.list_presets()),
            Command::Settings { path } => self.show_settings(path),
        }
    }

    fn read_script(&self, input: &str, lang: Option<&str>) -> Result<Script, CortexError> {
        let (content, source, filename) = if input == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            (buffer, ScriptSource::Stdin, None)
        } else {
            let path = Path::new(input);
            let content = std::fs::read_to_string(path)?;
            (content, ScriptSource::File(path.to_path_buf()), Some(input))
        };

        let language = LanguageDetector::new().detect_language(&content, lang, filename);
        let script = Script::new(content, source).with_language(language);
        if script.is_empty() {
            return Err(CortexError::NoInput);
        }

        log::info!("read {} bytes, language: {}", script.content.len(), script.language);
        Ok(script)
    }

    async fn run_snippet(&self, args: &RunArgs) -> Result<i32, CortexError> {
        let script = self.read_script(&args.input, args.lang.as_deref())?;
        let timeout = args.timeout.unwrap_or(self.settings.execution_timeout);

        let mut sandbox = self.settings.sandbox.clone();
        if args.no_container {
            sandbox.use_container = false;
        }

        let executor = SandboxedExecutor::new(sandbox).await;
        // JSON mode keeps stdout machine-readable, so it never prompts
        let executor = if args.yes {
            executor.with_gate(AutoApprove)
        } else if args.json {
            executor.with_gate(DenyRisky)
        } else {
            executor.with_gate(UserPrompter::for_cli(&self.cli))
        };

        let language = script.language.as_str();
        let report = executor.analyze(&script.content, language);
        if !args.json {
            println!("{}", self.formatter().format_analysis_report(&report));
        }

        let result = executor
            .execute_analyzed(&script.content, language, &report, timeout)
            .await;

        if args.json {
            let document = serde_json::json!({ "analysis": report, "result": result });
            println!("{}", serde_json::to_string_pretty(&document)?);
        } else {
            println!("{}", self.formatter().format_execution_result(&result));
        }

        Ok(exit_code_for(&result))
    }

    fn analyze_snippet(&self, args: &AnalyzeArgs) -> Result<i32, CortexError> {
        let script = self.read_script(&args.input, args.lang.as_deref())?;
        let report = crate::analyzer::CodeAnalyzer::new()
            .analyze_language(&script.content, script.language.clone());

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", self.formatter().format_analysis_report(&report));
        }
        Ok(0)
    }

    fn llm_client(
        &self,
        model: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<OllamaClient, CortexError> {
        let model = PromptTemplate::resolve_model(model.unwrap_or(&self.settings.model));
        let config = LlmConfig::new(model)
            .with_base_url(self.settings.ollama_url.clone())
            .with_timeout(self.settings.request_timeout)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(temperature.unwrap_or(self.settings.temperature));
        OllamaClient::new(config)
    }

    fn system_prompt(&self, preset: Option<&str>) -> Result<Option<String>, CortexError> {
        match preset {
            Some(name) => Ok(Some(PromptTemplate::system_prompt(name)?.to_string())),
            None => Ok(self.settings.system_prompt.clone()),
        }
    }

    async fn ensure_reachable(&self, client: &OllamaClient) -> Result<(), CortexError> {
        if client.health_check().await {
            Ok(())
        } else {
            Err(CortexError::OllamaUnavailable {
                url: client.config().base_url.clone(),
            })
        }
    }

    async fn ask(&self, args: &AskArgs) -> Result<i32, CortexError> {
        let client = self.llm_client(args.model.as_deref(), args.temperature)?;
        self.ensure_reachable(&client).await?;

        let system_prompt = self.system_prompt(args.preset.as_deref())?;
        let response = client
            .generate_text(&args.prompt_text(), system_prompt.as_deref())
            .await?;

        println!("{}", response);
        Ok(0)
    }

    async fn chat(&self, args: &ChatArgs) -> Result<i32, CortexError> {
        let client = self.llm_client(args.model.as_deref(), args.temperature)?;
        self.ensure_reachable(&client).await?;

        let mut session = ChatSession::new(Box::new(client))
            .with_system_prompt(self.system_prompt(args.preset.as_deref())?);
        if args.save_history || self.settings.save_history {
            session = session.with_history(ChatHistory::new(self.settings.history_file.clone()));
        }
        if let Some(ref dir) = args.auto_save {
            let dir = dir.clone().unwrap_or_else(|| self.settings.output_dir.clone());
            session = session.with_auto_save(dir);
        }

        let executor = SandboxedExecutor::new(self.settings.sandbox.clone())
            .await
            .with_gate(UserPrompter::for_cli(&self.cli));
        let formatter = self.formatter();

        println!(
            "{}",
            formatter.format_progress(&format!(
                "Chatting with {}. Type /help for commands, 'exit' to leave.",
                session.model_name()
            ))
        );

        loop {
            print!("\nyou> ");
            io::stdout().flush()?;

            let line = match stdin_lines().read_line(None) {
                Line::Text(line) => line,
                Line::Eof | Line::TimedOut => {
                    println!();
                    break;
                }
            };

            match ReplCommand::parse(&line) {
                ReplCommand::Exit => break,
                ReplCommand::Empty => continue,
                ReplCommand::Help => println!("{}", REPL_HELP),
                ReplCommand::Blocks => println!("{}", formatter.format_code_blocks(session.blocks())),
                ReplCommand::Run(index) => match session.block(index) {
                    Some(block) => {
                        let language = block_language(block);
                        let result = executor
                            .execute(&block.code, language.as_str(), self.settings.execution_timeout)
                            .await;
                        println!("{}", formatter.format_execution_result(&result));
                    }
                    None => println!("No such code block. Use /blocks to list them."),
                },
                ReplCommand::Analyze(index) => match session.block(index) {
                    Some(block) => {
                        let language = block_language(block);
                        let report = executor.analyze(&block.code, language.as_str());
                        println!("{}", formatter.format_analysis_report(&report));
                    }
                    None => println!("No such code block. Use /blocks to list them."),
                },
                ReplCommand::Read(path) => match std::fs::read_to_string(&path) {
                    Ok(content) => {
                        let prompt = PromptTemplate::build_file_prompt(
                            &path,
                            &content,
                            "Explain what this file does.",
                        );
                        self.chat_turn(&mut session, &prompt, &formatter).await;
                    }
                    Err(e) => println!("{}", formatter.format_error(&CortexError::IoError(e))),
                },
                ReplCommand::Write { path, content } => match write_file(Path::new(&path), &content) {
                    Ok(()) => println!("{}", formatter.format_progress(&format!("Wrote {}", path))),
                    Err(e) => println!("{}", formatter.format_error(&e)),
                },
                ReplCommand::List(dir) => {
                    let dir = dir.unwrap_or_else(|| ".".to_string());
                    match list_project_files(Path::new(&dir)) {
                        Ok(files) => println!("{}", formatter.format_file_listing(&dir, &files, LIST_LIMIT)),
                        Err(e) => println!("{}", formatter.format_error(&e)),
                    }
                }
                ReplCommand::Save(dir) => {
                    let dir = dir
                        .map(PathBuf::from)
                        .unwrap_or_else(|| self.settings.output_dir.clone());
                    if session.blocks().is_empty() {
                        println!("No code blocks in the last answer.");
                    } else {
                        match session.save_blocks(&dir) {
                            Ok(paths) => {
                                for path in paths {
                                    println!("{}", formatter.format_progress(&format!("Saved {}", path.display())));
                                }
                            }
                            Err(e) => println!("{}", formatter.format_error(&e)),
                        }
                    }
                }
                ReplCommand::Prompt(text) => self.chat_turn(&mut session, &text, &formatter).await,
                ReplCommand::Unknown(command) => {
                    println!("Unknown command '{}'. Type /help for commands.", command)
                }
            }
        }

        log::info!("chat ended after {} turn(s)", session.turns());
        Ok(0)
    }

    async fn chat_turn(&self, session: &mut ChatSession, prompt: &str, formatter: &ReportFormatter) {
        match session.send(prompt).await {
            Ok(response) => {
                println!("\n{}", response);
                if !session.blocks().is_empty() {
                    println!(
                        "{}",
                        formatter.format_progress(&format!(
                            "{} code block(s); /run N to execute",
                            session.blocks().len()
                        ))
                    );
                }
            }
            Err(e) => println!("{}", formatter.format_error(&e)),
        }
    }

    async fn list_models(&self) -> Result<i32, CortexError> {
        let client = self.llm_client(None, None)?;
        let installed = client.list_models().await?;

        println!("Installed models:");
        if installed.is_empty() {
            println!("  (none)");
        }
        for name in &installed {
            println!("  {}", name);
        }

        println!("\nAliases:");
        for (alias, tag) in crate::analyzer::prompts::MODEL_ALIASES {
            let marker = if installed.iter().any(|name| name == tag) { "✓" } else { " " };
            println!("  {} {:<12} {}", marker, alias, tag);
        }
        Ok(0)
    }

    async fn install_model(&self, model: &str) -> Result<i32, CortexError> {
        let tag = PromptTemplate::resolve_model(model);
        let client = self.llm_client(Some(tag.as_str()), None)?;
        self.ensure_reachable(&client).await?;

        println!(
            "{}",
            self.formatter()
                .format_progress(&format!("Pulling {} (this can take a while)...", tag))
        );
        client.pull_model(&tag).await?;
        println!("✅ {} installed", tag);
        Ok(0)
    }

    fn list_presets(&self) -> i32 {
        for (name, prompt) in crate::analyzer::prompts::SYSTEM_PRESETS {
            println!("{:<16} {}", name, prompt);
        }
        0
    }

    fn show_settings(&self, path_only: bool) -> Result<i32, CortexError> {
        if path_only {
            match Settings::resolve_path(self.cli.config.as_deref()).0 {
                Some(path) => println!("{}", path.display()),
                None => println!("(no config directory available)"),
            }
        } else {
            println!("{}", serde_json::to_string_pretty(&self.settings)?);
        }
        Ok(0)
    }
}

/// Untagged fences are sniffed; tagged ones keep their tag.
fn block_language(block: &CodeBlock) -> Language {
    if block.language == "text" {
        LanguageDetector::new().detect_language(&block.code, None, None)
    } else {
        Language::parse(&block.language)
    }
}

pub fn exit_code_for(result: &ExecutionResult) -> i32 {
    match result.status {
        _ if result.success => 0,
        ExecutionStatus::Cancelled => 3,
        ExecutionStatus::TimedOut => 4,
        _ => 1,
    }
}
