use crate::error::CortexError;
use crate::models::{AnalysisReport, Complexity, ExecutionResult, ExecutionStatus};
use crate::session::{CodeBlock, ProjectFile};

const BOLD_RED: &str = "\x1b[1m\x1b[31m";
const BOLD_YELLOW: &str = "\x1b[1m\x1b[33m";
const BOLD_GREEN: &str = "\x1b[1m\x1b[32m";
const BOLD_CYAN: &str = "\x1b[1m\x1b[36m";
const BOLD_WHITE: &str = "\x1b[1m\x1b[37m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

pub struct ReportFormatter {
    use_colors: bool,
    verbose: bool,
}

impl ReportFormatter {
    pub fn new(use_colors: bool, verbose: bool) -> Self {
        Self {
            use_colors,
            verbose,
        }
    }

    pub fn plain() -> Self {
        Self::new(false, false)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn format_section(&self, title: &str, content: &str) -> String {
        if self.use_colors {
            format!("{}\n{}", self.paint(BOLD_WHITE, title), content)
        } else {
            format!("{}\n{}\n{}", title, "─".repeat(title.chars().count()), content)
        }
    }

    pub fn format_analysis_report(&self, report: &AnalysisReport) -> String {
        let mut output = String::new();

        output.push_str(&self.paint(BOLD_CYAN, "═══ Code Analysis ═══"));
        output.push('\n');
        output.push_str(&format!(
            "Language: {} ({} lines, {} chars, {} words)\n",
            report.language, report.line_count, report.char_count, report.word_count
        ));
        output.push_str(&format!(
            "Complexity: {}\n\n",
            self.format_complexity(report.complexity)
        ));

        if let Some(ref error) = report.syntax_error {
            output.push_str(&self.paint(BOLD_RED, &format!("Syntax error: {}", error)));
            output.push('\n');
            return output;
        }

        if !report.imports.is_empty() {
            output.push_str(&self.format_section("Imports", &report.imports.join(", ")));
            output.push_str("\n\n");
        }

        if self.verbose && !report.called_functions.is_empty() {
            output.push_str(&self.format_section(
                "Called functions",
                &report.called_functions.join(", "),
            ));
            output.push_str("\n\n");
        }

        if report.has_risks() {
            let risks = report
                .security_risks
                .iter()
                .map(|risk| format!("  ⚠️  {}", risk))
                .collect::<Vec<_>>()
                .join("\n");
            output.push_str(&self.paint(
                BOLD_YELLOW,
                &format!("{} security risk(s) found", report.security_risks.len()),
            ));
            output.push('\n');
            output.push_str(&risks);
            output.push('\n');
        } else {
            output.push_str(&self.paint(BOLD_GREEN, "✅ No security risks found"));
            output.push('\n');
        }

        output
    }

    fn format_complexity(&self, complexity: Complexity) -> String {
        let color = match complexity {
            Complexity::Low => BOLD_GREEN,
            Complexity::Medium => BOLD_YELLOW,
            Complexity::High => BOLD_RED,
        };
        self.paint(color, complexity.as_str())
    }

    pub fn format_execution_result(&self, result: &ExecutionResult) -> String {
        let mut output = String::new();

        let headline = match result.status {
            ExecutionStatus::Completed if result.success => {
                self.paint(BOLD_GREEN, "✅ Execution succeeded")
            }
            ExecutionStatus::Completed => self.paint(BOLD_RED, "❌ Execution failed"),
            ExecutionStatus::TimedOut => self.paint(BOLD_YELLOW, "⏰ Execution timed out"),
            ExecutionStatus::Cancelled => self.paint(BOLD_YELLOW, "🚫 Execution cancelled"),
            ExecutionStatus::Unsupported => self.paint(BOLD_RED, "❌ Unsupported language"),
            ExecutionStatus::Failed => self.paint(BOLD_RED, "❌ Execution error"),
        };
        output.push_str(&headline);
        output.push('\n');

        let exit_code = result
            .exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&self.paint(
            DIM,
            &format!(
                "language={} strategy={} exit={} time={:.3}s",
                result.language,
                result.strategy.as_str(),
                exit_code,
                result.execution_time_seconds
            ),
        ));
        output.push('\n');

        if !result.output.is_empty() {
            output.push('\n');
            output.push_str(&self.format_section("Output", result.output.trim_end()));
            output.push('\n');
        }

        if !result.error.is_empty() {
            output.push('\n');
            output.push_str(&self.format_section("Errors", result.error.trim_end()));
            output.push('\n');
        }

        output
    }

    pub fn format_code_blocks(&self, blocks: &[CodeBlock]) -> String {
        if blocks.is_empty() {
            return "No code blocks in the last answer.".to_string();
        }

        blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let first_line = block.code.lines().next().unwrap_or("");
                format!(
                    "[{}] {} ({} lines) {}",
                    i + 1,
                    block.language,
                    block.code.lines().count(),
                    self.paint(DIM, first_line)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// At most `limit` rows, then a count of what was left out.
    pub fn format_file_listing(&self, dir: &str, files: &[ProjectFile], limit: usize) -> String {
        if files.is_empty() {
            return format!("No files under {}", dir);
        }

        let mut lines = vec![self.paint(BOLD_WHITE, &format!("Files in {}", dir))];
        for file in files.iter().take(limit) {
            lines.push(format!(
                "  {:<48} {}",
                file.path.display(),
                self.paint(DIM, &format!("{} bytes", file.size))
            ));
        }
        if files.len() > limit {
            lines.push(self.paint(DIM, &format!("  ... and {} more", files.len() - limit)));
        }
        lines.join("\n")
    }

    pub fn format_error(&self, error: &CortexError) -> String {
        self.paint(BOLD_RED, &format!("❌ {}", error))
    }

    pub fn format_progress(&self, message: &str) -> String {
        self.paint("\x1b[36m", message)
    }
}
