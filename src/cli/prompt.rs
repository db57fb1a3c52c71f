use crate::cli::input::{stdin_lines, Line};
use crate::error::CortexError;
use crate::executor::ConfirmationGate;
use crate::models::{AnalysisReport, ExecutionDecision};
use std::io::{self, Write};
use std::time::Duration;

const MAX_RETRIES: usize = 3;

/// Interactive yes/no gate shown before a risky snippet runs.
pub struct UserPrompter {
    timeout: Option<Duration>,
    use_colors: bool,
}

impl UserPrompter {
    pub fn new(timeout_seconds: Option<u64>, use_colors: bool) -> Self {
        Self {
            timeout: timeout_seconds.map(Duration::from_secs),
            use_colors,
        }
    }

    pub fn for_cli(cli: &crate::cli::args::Cli) -> Self {
        let timeout = if cli.is_debug() { None } else { Some(300) };
        Self::new(timeout, cli.should_use_color())
    }

    pub fn prompt_execution_decision(
        &self,
        report: &AnalysisReport,
    ) -> Result<ExecutionDecision, CortexError> {
        self.display_risks(report)?;

        for _ in 0..MAX_RETRIES {
            let response = self.get_user_input()?;
            if let Some(decision) = Self::parse_execution_response(&response) {
                return Ok(decision);
            }
            print!("Please answer 'yes' to run or 'no' to cancel: ");
            io::stdout().flush()?;
        }

        Ok(ExecutionDecision::decline())
    }

    fn display_risks(&self, report: &AnalysisReport) -> Result<(), CortexError> {
        let (color_start, color_end) = if self.use_colors {
            ("\x1b[1m\x1b[33m", "\x1b[0m")
        } else {
            ("", "")
        };

        println!(
            "\n{}⚠️  {} security risk(s) detected in this {} snippet:{}",
            color_start,
            report.security_risks.len(),
            report.language,
            color_end
        );
        for risk in &report.security_risks {
            println!("  - {}", risk);
        }
        println!();
        print!("Run it anyway? Type 'yes' to execute, 'no' to cancel: ");
        io::stdout().flush()?;
        Ok(())
    }

    /// `None` for anything that is neither a yes nor a no.
    pub fn parse_execution_response(response: &str) -> Option<ExecutionDecision> {
        match response.trim().to_lowercase().as_str() {
            "yes" | "y" | "execute" | "proceed" | "run" => Some(ExecutionDecision::proceed()),
            "no" | "n" | "cancel" | "abort" | "stop" | "" => Some(ExecutionDecision::decline()),
            _ => None,
        }
    }

    fn get_user_input(&self) -> Result<String, CortexError> {
        match stdin_lines().read_line(self.timeout) {
            Line::Text(input) => Ok(input.trim().to_lowercase()),
            // EOF (Ctrl+D) reads as "no"
            Line::Eof => Ok("no".to_string()),
            Line::TimedOut => {
                println!("\n⏰ No answer in time. Defaulting to 'no'.");
                Ok("no".to_string())
            }
        }
    }
}

impl ConfirmationGate for UserPrompter {
    fn confirm(&self, report: &AnalysisReport) -> ExecutionDecision {
        match self.prompt_execution_decision(report) {
            Ok(decision) => decision,
            Err(e) => {
                log::warn!("confirmation prompt failed, declining: {}", e);
                ExecutionDecision::decline()
            }
        }
    }
}
