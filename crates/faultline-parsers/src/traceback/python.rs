//! Python tracebacks already list frames oldest-caller-first ("most recent
//! call last"), so no reordering is needed here -- only extraction.

use std::sync::OnceLock;

use faultline_core::types::Frame;
use regex::Regex;

fn frame_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*File "(?P<file>[^"]+)", line (?P<line>\d+), in (?P<symbol>.+?)\s*$"#).unwrap())
}

fn error_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^([\w.]*(?:Error|Exception|Warning)\w*): (.*)$").unwrap())
}

pub fn parse(log: &str) -> (Vec<Frame>, Option<String>) {
    let lines: Vec<&str> = log.lines().collect();
    let mut frames = Vec::new();

    for caps in frame_re().captures_iter(log) {
        let file = caps["file"].to_string();
        let line: u32 = caps["line"].parse().unwrap_or(0);
        let symbol = caps["symbol"].trim().to_string();
        let external = is_stdlib_or_site_packages(&file);
        frames.push(Frame {
            file,
            line,
            column: None,
            symbol: Some(symbol),
            raw_text: caps.get(0).unwrap().as_str().trim().to_string(),
            external,
        });
    }

    let error_message = error_line_re()
        .captures(log)
        .map(|c| format!("{}: {}", &c[1], c[2].trim()))
        .or_else(|| lines.last().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()));

    (frames, error_message)
}

fn is_stdlib_or_site_packages(file: &str) -> bool {
    file.contains("site-packages") || file.contains("/lib/python") || file.starts_with("<")
}
