//! Go panic traces interleave a function-name line with an indented
//! `file:line` continuation; the two are merged into one [`Frame`]. The
//! `goroutine N [state]:` header is skipped rather than treated as a frame.
//! Listed innermost-first, like the other native stack traces, so the
//! result is reversed.

use std::sync::OnceLock;

use faultline_core::types::Frame;
use regex::Regex;

fn func_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w./*]+\(.*\)$").unwrap())
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?P<file>\S+\.go):(?P<line>\d+)").unwrap())
}

pub fn parse(log: &str) -> (Vec<Frame>, Option<String>) {
    let mut frames = Vec::new();
    let mut pending_symbol: Option<String> = None;

    for line in log.lines() {
        if line.starts_with("goroutine ") {
            pending_symbol = None;
            continue;
        }
        if let Some(caps) = location_re().captures(line) {
            frames.push(Frame {
                file: caps["file"].to_string(),
                line: caps["line"].parse().unwrap_or(0),
                column: None,
                symbol: pending_symbol.take(),
                raw_text: line.trim().to_string(),
                external: is_external(&caps["file"]),
            });
            continue;
        }
        let trimmed = line.trim();
        if func_re().is_match(trimmed) {
            pending_symbol = Some(trimmed.to_string());
        }
    }
    frames.reverse();

    let error_message = log
        .lines()
        .find(|l| l.starts_with("panic:"))
        .map(|l| l.trim().to_string());

    (frames, error_message)
}

fn is_external(file: &str) -> bool {
    file.contains("/go/pkg/mod/") || file.contains("/usr/local/go/src/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_function_and_location_lines_and_reverses() {
        let log = "panic: runtime error: index out of range [3] with length 3\n\ngoroutine 1 [running]:\nmain.doStuff(...)\n\t/app/main.go:10 +0x1a\nmain.main()\n\t/app/main.go:5 +0x65\n";
        let (frames, message) = parse(log);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].symbol.as_deref(), Some("main.main()"));
        assert_eq!(frames[1].symbol.as_deref(), Some("main.doStuff(...)"));
        assert_eq!(
            message.as_deref(),
            Some("panic: runtime error: index out of range [3] with length 3")
        );
    }
}
