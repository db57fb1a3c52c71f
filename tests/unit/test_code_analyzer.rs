use cortex::{CodeAnalyzer, Complexity, Language};

#[test]
fn clean_python_reports_symbols_without_risks() {
    let analyzer = CodeAnalyzer::new();
    let source = "import json\nfrom collections import OrderedDict\n\ndata = json.dumps({})\nprint(len(data))\n";

    let report = analyzer.analyze(source, "python");

    assert_eq!(report.imports, vec!["json", "collections.OrderedDict"]);
    assert_eq!(report.called_functions, vec!["print", "len"]);
    assert!(report.security_risks.is_empty());
    assert!(report.syntax_error.is_none());
    assert_eq!(report.complexity, Complexity::Low);
}

#[test]
fn dangerous_import_and_call_are_both_reported() {
    let analyzer = CodeAnalyzer::new();
    let report = analyzer.analyze("import subprocess\nexec('x = 1')\n", "python");

    assert_eq!(
        report.security_risks,
        vec!["Dangerous import: subprocess", "Dangerous function: exec"]
    );
}

#[test]
fn submodule_import_matches_root_package() {
    let analyzer = CodeAnalyzer::new();
    let report = analyzer.analyze("import os.path\nfrom urllib.request import urlopen\n", "python");

    assert_eq!(report.security_risks.len(), 2);
    assert!(report.security_risks[0].contains("os.path"));
    assert!(report.security_risks[1].contains("urllib.request.urlopen"));
}

#[test]
fn attribute_calls_are_not_bare_calls() {
    let analyzer = CodeAnalyzer::new();
    let report = analyzer.analyze("import math\nmath.floor(1.5)\n", "python");

    assert!(report.called_functions.is_empty());
    assert!(report.security_risks.is_empty());
}

#[test]
fn syntax_error_clears_everything_else() {
    let analyzer = CodeAnalyzer::new();
    let report = analyzer.analyze("import os\nif True print('x')\n", "python");

    let message = report.syntax_error.expect("syntax error expected");
    assert!(message.starts_with("invalid syntax at line "));
    assert!(report.imports.is_empty());
    assert!(report.security_risks.is_empty());
    assert_eq!(report.line_count, 3);
}

#[test]
fn javascript_patterns_are_case_insensitive() {
    let analyzer = CodeAnalyzer::new();
    let report = analyzer.analyze("EVAL(code); window.localStorage.clear();", "js");

    assert_eq!(report.language, Language::Javascript);
    assert_eq!(report.security_risks.len(), 2);
}

#[test]
fn bash_substring_denylist() {
    let analyzer = CodeAnalyzer::new();
    let report = analyzer.analyze("sudo rm -rf /tmp/x\n", "bash");

    assert!(report.security_risks.contains(&"Dangerous command: rm -rf".to_string()));
    assert!(report.security_risks.contains(&"Dangerous command: sudo".to_string()));
}

#[test]
fn unknown_language_gets_counts_only() {
    let analyzer = CodeAnalyzer::new();
    let report = analyzer.analyze("fn main() { println!(\"hi\"); }", "rust");

    assert_eq!(report.language, Language::Other("rust".to_string()));
    assert_eq!(report.line_count, 1);
    assert_eq!(report.word_count, 5);
    assert!(report.security_risks.is_empty());
}

#[test]
fn many_calls_raise_complexity() {
    let analyzer = CodeAnalyzer::new();
    let medium: String = (0..11).map(|i| format!("f{}()\n", i)).collect();
    let high: String = (0..21).map(|i| format!("f{}()\n", i)).collect();

    assert_eq!(analyzer.analyze(&medium, "python").complexity, Complexity::Medium);
    assert_eq!(analyzer.analyze(&high, "python").complexity, Complexity::High);
}

#[test]
fn empty_source_never_panics() {
    let analyzer = CodeAnalyzer::new();

    for language in ["python", "javascript", "bash", "cobol"] {
        let report = analyzer.analyze("", language);
        assert_eq!(report.line_count, 1);
        assert_eq!(report.word_count, 0);
        assert!(report.security_risks.is_empty());
    }
}

#[test]
fn python2_only_syntax_is_a_syntax_error() {
    let analyzer = CodeAnalyzer::new();

    for source in ["print \"hi\"\n", "exec \"import os\"\n", "a := 1\n"] {
        let report = analyzer.analyze(source, "python");
        let message = report
            .syntax_error
            .unwrap_or_else(|| panic!("accepted {:?}", source));
        assert!(message.starts_with("invalid syntax at line 1, column "), "{}", message);
        assert!(report.security_risks.is_empty());
    }
}

#[test]
fn parenthesized_walrus_is_valid() {
    let analyzer = CodeAnalyzer::new();
    let report = analyzer.analyze("if (n := len([1])) > 0:\n    print(n)\n", "python");

    assert!(report.syntax_error.is_none());
    assert!(report.called_functions.contains(&"len".to_string()));
    assert!(report.called_functions.contains(&"print".to_string()));
}
