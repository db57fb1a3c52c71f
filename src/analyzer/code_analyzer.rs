use crate::error::CortexError;
use crate::models::{AnalysisReport, Language};
use crate::parser::{ComponentExtractor, SecurityClassifier, TreeSitterParser};

/// Static, language-aware risk scanner. Never executes anything and never
/// fails: parse problems are reported through `AnalysisReport::syntax_error`.
pub struct CodeAnalyzer {
    classifier: SecurityClassifier,
    extractor: ComponentExtractor,
}

impl CodeAnalyzer {
    pub fn new() -> Self {
        Self {
            classifier: SecurityClassifier::new(),
            extractor: ComponentExtractor::new(),
        }
    }

    pub fn analyze(&self, source: &str, language: &str) -> AnalysisReport {
        self.analyze_language(source, Language::parse(language))
    }

    pub fn analyze_language(&self, source: &str, language: Language) -> AnalysisReport {
        let report = AnalysisReport::new(language.clone(), source);

        match language {
            Language::Python => self.analyze_python(source, report),
            Language::Javascript => self.analyze_javascript(source, report),
            Language::Bash => self.analyze_bash(source, report),
            Language::Other(_) => report,
        }
    }

    fn analyze_python(&self, source: &str, report: AnalysisReport) -> AnalysisReport {
        let symbols = TreeSitterParser::python().and_then(|mut parser| parser.extract_symbols(source));

        match symbols {
            Ok(symbols) => {
                let risks = self
                    .classifier
                    .classify_python(&symbols.imports, &symbols.calls);
                report
                    .with_imports(symbols.imports)
                    .with_called_functions(symbols.calls)
                    .with_security_risks(risks)
            }
            Err(CortexError::ParseError(message)) => {
                log::debug!("python analysis stopped at syntax error: {}", message);
                report.with_syntax_error(message)
            }
            Err(e) => report.with_syntax_error(e.to_string()),
        }
    }

    fn analyze_javascript(&self, source: &str, report: AnalysisReport) -> AnalysisReport {
        report
            .with_imports(self.extractor.javascript_imports(source))
            .with_security_risks(self.classifier.classify_javascript(source))
    }

    fn analyze_bash(&self, source: &str, report: AnalysisReport) -> AnalysisReport {
        report
            .with_imports(self.extractor.bash_sources(source))
            .with_security_risks(self.classifier.classify_bash(source))
    }
}

impl Default for CodeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
