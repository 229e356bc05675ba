//! Rust panics carry the crash-site location in the `panicked at` header
//! line itself; an optional `RUST_BACKTRACE` dump adds numbered frames
//! above it, innermost-first, which are reversed and filtered down to
//! project-relevant symbols (panic-runtime and std frames are dropped).

use std::sync::OnceLock;

use faultline_core::types::Frame;
use regex::Regex;

fn panic_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"panicked at (?P<file>[^:]+):(?P<line>\d+):(?P<col>\d+):").unwrap())
}

fn backtrace_frame_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*\d+:\s+(?P<symbol>\S.*)$").unwrap())
}

fn backtrace_location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*at (?P<file>[^:]+):(?P<line>\d+)(?::(?P<col>\d+))?").unwrap())
}

pub fn parse(log: &str) -> (Vec<Frame>, Option<String>) {
    let mut frames = Vec::new();

    if let Some(caps) = panic_header_re().captures(log) {
        frames.push(Frame {
            file: caps["file"].to_string(),
            line: caps["line"].parse().unwrap_or(0),
            column: caps["col"].parse().ok(),
            symbol: None,
            raw_text: caps.get(0).unwrap().as_str().trim().to_string(),
            external: false,
        });
    }

    let lines: Vec<&str> = log.lines().collect();
    let mut backtrace = Vec::new();
    let mut pending_symbol: Option<String> = None;
    for line in &lines {
        if let Some(caps) = backtrace_frame_re().captures(line) {
            pending_symbol = Some(caps["symbol"].trim().to_string());
            continue;
        }
        if let Some(caps) = backtrace_location_re().captures(line) {
            if let Some(symbol) = pending_symbol.take() {
                if !is_internal(&symbol) {
                    backtrace.push(Frame {
                        file: caps["file"].to_string(),
                        line: caps["line"].parse().unwrap_or(0),
                        column: caps.name("col").and_then(|m| m.as_str().parse().ok()),
                        symbol: Some(symbol),
                        raw_text: line.trim().to_string(),
                        external: false,
                    });
                }
            }
        }
    }
    backtrace.reverse();
    frames.extend(backtrace);

    let error_message = panic_message(log);
    (frames, error_message)
}

fn is_internal(symbol: &str) -> bool {
    symbol.starts_with("std::")
        || symbol.starts_with("core::")
        || symbol.starts_with("rust_begin_unwind")
        || symbol.starts_with("__rust")
}

fn panic_message(log: &str) -> Option<String> {
    let header_line = log.lines().find(|l| l.contains("panicked at"))?;
    let after_header = log.split(header_line).nth(1)?;
    after_header
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_panic_site_and_message_without_backtrace() {
        let log = "thread 'main' panicked at src/main.rs:10:5:\nindex out of bounds: the len is 3 but the index is 5\nnote: run with `RUST_BACKTRACE=1` environment variable to display a backtrace\n";
        let (frames, message) = parse(log);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].file, "src/main.rs");
        assert_eq!(frames[0].line, 10);
        assert_eq!(
            message.as_deref(),
            Some("index out of bounds: the len is 3 but the index is 5")
        );
    }

    #[test]
    fn backtrace_frames_are_reversed_and_internals_dropped() {
        let log = "thread 'main' panicked at src/main.rs:10:5:\nboom\nstack backtrace:\n   0: rust_begin_unwind\n   1: core::panicking::panic_fmt\n   2: myapp::main\n             at src/main.rs:10:5\n";
        let (frames, _) = parse(log);
        // frame 0 from the header, frame 1 from the filtered backtrace.
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].symbol.as_deref(), Some("myapp::main"));
    }
}
