//! Raw error log -> normalized [`Frame`] list.
//!
//! Each language has its own stack-trace convention, including its own
//! opinion on whether the crash site or the outermost caller comes first.
//! Every parser here normalizes to oldest-caller-first so the rest of the
//! pipeline never has to special-case ordering per language.

mod go;
mod java;
mod javascript;
mod python;
mod rust_lang;

use faultline_core::types::{Frame, Language};
use std::sync::OnceLock;

/// The result of parsing a raw log: the language it was recognized as, the
/// normalized frame list, and the top-level error message if one could be
/// isolated from the surrounding noise.
#[derive(Debug, Clone)]
pub struct TracebackResult {
    pub language: Language,
    pub frames: Vec<Frame>,
    pub error_message: Option<String>,
}

/// Parses `log`. `hint` overrides auto-detection (the CLI's `--language`
/// flag); when absent, the language is inferred from marker text in
/// priority order: Python, Go, Rust, Java, then JavaScript/TypeScript as
/// the catch-all for a generic `at file:line:col` stack.
pub fn parse(log: &str, hint: Option<Language>) -> TracebackResult {
    let language = hint.unwrap_or_else(|| detect_language(log));
    let (frames, error_message) = match language {
        Language::Python => python::parse(log),
        Language::Go => go::parse(log),
        Language::Rust => rust_lang::parse(log),
        Language::Java => java::parse(log),
        Language::Javascript | Language::Typescript => javascript::parse(log),
        Language::Unknown => (Vec::new(), first_nonblank_line(log)),
    };
    TracebackResult {
        language,
        frames,
        error_message,
    }
}

fn detect_language(log: &str) -> Language {
    if log.contains("Traceback (most recent call last)") {
        return Language::Python;
    }
    if goroutine_re().is_match(log) {
        return Language::Go;
    }
    if log.contains("panicked at") && log.contains("thread '") {
        return Language::Rust;
    }
    if log.contains("Exception in thread") || java_frame_re().is_match(log) {
        return Language::Java;
    }
    if js_frame_re().is_match(log) {
        return Language::Javascript;
    }
    Language::Unknown
}

fn goroutine_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"goroutine \d+ \[").unwrap())
}

fn java_frame_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"(?m)^\s*at [\w.$]+\([\w.]+\.java(?::\d+)?\)").unwrap())
}

fn js_frame_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"(?m)^\s*at .+\(?[^():]+:\d+:\d+\)?").unwrap())
}

fn first_nonblank_line(log: &str) -> Option<String> {
    log.lines().map(str::trim).find(|l| !l.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_python_from_traceback_header() {
        let log = "Traceback (most recent call last):\n  File \"a.py\", line 1, in <module>\nValueError: bad\n";
        assert_eq!(detect_language(log), Language::Python);
    }

    #[test]
    fn detects_go_from_goroutine_header() {
        let log = "panic: boom\n\ngoroutine 1 [running]:\nmain.main()\n\t/app/main.go:5 +0x1\n";
        assert_eq!(detect_language(log), Language::Go);
    }

    #[test]
    fn detects_rust_from_panic_header() {
        let log = "thread 'main' panicked at src/main.rs:10:5:\nindex out of bounds\n";
        assert_eq!(detect_language(log), Language::Rust);
    }

    #[test]
    fn unrecognized_log_falls_back_to_unknown_with_first_line_as_message() {
        let result = parse("something went wrong\nmore detail\n", None);
        assert_eq!(result.language, Language::Unknown);
        assert_eq!(result.error_message.as_deref(), Some("something went wrong"));
        assert!(result.frames.is_empty());
    }

    #[test]
    fn explicit_hint_overrides_detection() {
        let log = "Traceback (most recent call last):\n  File \"a.py\", line 1, in <module>\nValueError: bad\n";
        let result = parse(log, Some(Language::Javascript));
        assert_eq!(result.language, Language::Javascript);
    }
}
