//! V8-style stack traces list the crash site first; reversed here to match
//! the oldest-caller-first convention used everywhere else.

use std::sync::OnceLock;

use faultline_core::types::Frame;
use regex::Regex;

fn frame_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*at\s+(?:(?P<fn>[^\s(][^(]*?)\s+\()?(?P<file>[^():\n]+):(?P<line>\d+):(?P<col>\d+)\)?\s*$").unwrap()
    })
}

pub fn parse(log: &str) -> (Vec<Frame>, Option<String>) {
    let mut frames: Vec<Frame> = frame_re()
        .captures_iter(log)
        .map(|caps| {
            let file = caps["file"].to_string();
            let external = is_external(&file);
            Frame {
                file,
                line: caps["line"].parse().unwrap_or(0),
                column: caps["col"].parse().ok(),
                symbol: caps.name("fn").map(|m| m.as_str().trim().to_string()),
                raw_text: caps.get(0).unwrap().as_str().trim().to_string(),
                external,
            }
        })
        .collect();
    frames.reverse();

    let error_message = log
        .lines()
        .find(|l| !l.trim().is_empty() && !l.trim_start().starts_with("at "))
        .map(|l| l.trim().to_string());

    (frames, error_message)
}

fn is_external(file: &str) -> bool {
    file.contains("node_modules") || file.starts_with("node:internal") || file.starts_with("internal/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_stack_to_oldest_caller_first() {
        let log = "TypeError: Cannot read properties of undefined (reading 'foo')\n    at Object.<anonymous> (/app/index.js:10:15)\n    at Module._compile (node:internal/modules/cjs/loader:1254:14)\n";
        let (frames, message) = parse(log);
        assert_eq!(frames.len(), 2);
        assert!(frames[0].file.contains("loader"));
        assert!(frames[1].file.contains("index.js"));
        assert!(frames[0].external);
        assert!(!frames[1].external);
        assert_eq!(
            message.as_deref(),
            Some("TypeError: Cannot read properties of undefined (reading 'foo')")
        );
    }
}
