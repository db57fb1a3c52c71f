// Parser module - syntax trees, denylists and regex extraction

pub mod classifier;
pub mod extractor;
pub mod language;
pub mod tree_sitter;

pub use classifier::SecurityClassifier;
pub use extractor::ComponentExtractor;
pub use language::LanguageDetector;
pub use self::tree_sitter::{PythonSymbols, TreeSitterParser};
