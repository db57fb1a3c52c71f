use crate::models::script::Language;
use serde::{Deserialize, Serialize};

/// Static analysis of a single snippet. Built fresh per call and never
/// mutated once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub language: Language,
    pub line_count: usize,
    pub char_count: usize,
    pub word_count: usize,
    pub imports: Vec<String>,
    pub called_functions: Vec<String>,
    pub security_risks: Vec<String>,
    pub complexity: Complexity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax_error: Option<String>,
}

/// Coarse size tag derived from the number of imports plus call sites.
/// It is not a real complexity metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub const MEDIUM_THRESHOLD: usize = 10;
    pub const HIGH_THRESHOLD: usize = 20;

    pub fn from_count(count: usize) -> Self {
        if count > Self::HIGH_THRESHOLD {
            Complexity::High
        } else if count > Self::MEDIUM_THRESHOLD {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

impl AnalysisReport {
    /// Report carrying only the generic text counts.
    pub fn new(language: Language, source: &str) -> Self {
        Self {
            language,
            line_count: source.split('\n').count(),
            char_count: source.chars().count(),
            word_count: source.split_whitespace().count(),
            imports: Vec::new(),
            called_functions: Vec::new(),
            security_risks: Vec::new(),
            complexity: Complexity::Low,
            syntax_error: None,
        }
    }

    pub fn with_imports(mut self, imports: Vec<String>) -> Self {
        self.imports = imports;
        self.update_complexity();
        self
    }

    pub fn with_called_functions(mut self, functions: Vec<String>) -> Self {
        self.called_functions = functions;
        self.update_complexity();
        self
    }

    pub fn with_security_risks(mut self, risks: Vec<String>) -> Self {
        self.security_risks = risks;
        self
    }

    pub fn with_syntax_error(mut self, message: String) -> Self {
        self.imports.clear();
        self.called_functions.clear();
        self.security_risks.clear();
        self.syntax_error = Some(message);
        self.update_complexity();
        self
    }

    fn update_complexity(&mut self) {
        self.complexity = Complexity::from_count(self.imports.len() + self.called_functions.len());
    }

    pub fn has_risks(&self) -> bool {
        !self.security_risks.is_empty()
    }

    pub fn has_syntax_error(&self) -> bool {
        self.syntax_error.is_some()
    }
}
