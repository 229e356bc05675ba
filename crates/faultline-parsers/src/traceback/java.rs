//! Java stack traces list the crash site first; reversed here. Anonymous
//! inner-class suffixes (`Foo$1`) are kept verbatim in the symbol rather
//! than stripped, since they're the only thing distinguishing which
//! lambda/anonymous class actually threw.

use std::sync::OnceLock;

use faultline_core::types::Frame;
use regex::Regex;

fn frame_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*at (?P<symbol>[\w.$]+)\((?P<file>[\w.$]+\.java)(?::(?P<line>\d+))?\)").unwrap()
    })
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^(?:Exception in thread \"[^\"]+\" )?([\w.$]*(?:Exception|Error)): (.*)$").unwrap())
}

pub fn parse(log: &str) -> (Vec<Frame>, Option<String>) {
    let mut frames: Vec<Frame> = frame_re()
        .captures_iter(log)
        .map(|caps| Frame {
            file: caps["file"].to_string(),
            line: caps.name("line").and_then(|m| m.as_str().parse().ok()).unwrap_or(0),
            column: None,
            symbol: Some(caps["symbol"].to_string()),
            raw_text: caps.get(0).unwrap().as_str().trim().to_string(),
            external: is_external(&caps["symbol"]),
        })
        .collect();
    frames.reverse();

    let error_message = header_re()
        .captures(log)
        .map(|c| format!("{}: {}", &c[1], c[2].trim()));

    (frames, error_message)
}

fn is_external(symbol: &str) -> bool {
    symbol.starts_with("java.") || symbol.starts_with("sun.") || symbol.starts_with("jdk.")
}
