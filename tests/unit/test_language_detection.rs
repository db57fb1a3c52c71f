use cortex::parser::LanguageDetector;
use cortex::{Language, Script, ScriptSource};

#[test]
fn cli_override_takes_priority() {
    let detector = LanguageDetector::new();
    let language = detector.detect_language("echo 'hello'", Some("python"), Some("run.sh"));

    assert_eq!(language, Language::Python);
}

#[test]
fn extension_beats_shebang() {
    let detector = LanguageDetector::new();
    let language = detector.detect_language("#!/usr/bin/env python3\n", None, Some("tool.sh"));

    assert_eq!(language, Language::Bash);
}

#[test]
fn shebang_detection_falls_back_when_no_overrides() {
    let detector = LanguageDetector::new();
    let language = detector.detect_language("#!/usr/bin/env python3\nprint('hi')", None, None);

    assert_eq!(language, Language::Python);
}

#[test]
fn unrecognised_file_extension_is_not_treated_as_python() {
    let detector = LanguageDetector::new();
    let language = detector.detect_language("puts 'hello'\n", None, Some("hello.rb"));

    assert_eq!(language, Language::Other("rb".to_string()));
}

#[test]
fn bare_snippet_defaults_to_python() {
    let detector = LanguageDetector::new();

    assert_eq!(detector.detect_language("x = 1\n", None, None), Language::Python);
}

#[test]
fn unknown_tag_is_kept_verbatim() {
    let language = Language::parse("  Ruby ");

    assert_eq!(language, Language::Other("Ruby".to_string()));
    assert_eq!(language.as_str(), "Ruby");
}

#[test]
fn tags_are_case_insensitive_with_aliases() {
    for tag in ["python", "PYTHON", "Py", "python3"] {
        assert_eq!(Language::parse(tag), Language::Python, "tag {tag}");
    }
    for tag in ["javascript", "JS", "node"] {
        assert_eq!(Language::parse(tag), Language::Javascript, "tag {tag}");
    }
    for tag in ["bash", "sh", "Shell"] {
        assert_eq!(Language::parse(tag), Language::Bash, "tag {tag}");
    }
}

#[test]
fn script_carries_detected_language() {
    let script = Script::new("echo hi\n".to_string(), ScriptSource::Stdin).with_language(Language::Bash);

    assert_eq!(script.language, Language::Bash);
    assert!(!script.is_empty());
}
