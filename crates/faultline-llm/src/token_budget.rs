//! Character-budget estimation and truncation for prompt sections.
//!
//! Faultline renders a prompt, not a token stream, so this approximates
//! token count from character count (1 token ~= 4 chars) purely to decide
//! how much of a section to keep -- it is never sent to the model.

const CHARS_PER_TOKEN: usize = 4;

pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(CHARS_PER_TOKEN)
}

/// Truncates `text` to at most `max_tokens` worth of characters, cutting at
/// the nearest preceding line boundary so a section never ends mid-line.
/// Returns the kept text and whether truncation happened.
pub fn truncate_to_budget(text: &str, max_tokens: usize) -> (String, bool) {
    let max_chars = max_tokens * CHARS_PER_TOKEN;
    if text.len() <= max_chars {
        return (text.to_string(), false);
    }

    let mut cut = max_chars;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let kept = match text[..cut].rfind('\n') {
        Some(idx) if idx > 0 => &text[..idx],
        _ => &text[..cut],
    };
    (kept.to_string(), true)
}
