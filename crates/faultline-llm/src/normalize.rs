//! Normalizes a raw model response into a [`FixProposal`].
//!
//! Despite being told to emit bare JSON, models occasionally wrap it in
//! prose or a markdown code fence; this pulls out the first balanced-brace
//! object before handing it to serde.

use faultline_core::error::{FaultlineError, Result};
use faultline_core::types::FixProposal;

/// Finds the first `{...}` span in `text` with balanced braces, ignoring
/// braces inside string literals. Returns `None` if no closing brace ever
/// balances the opening one.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses `raw` into a [`FixProposal`], extracting the JSON object first.
pub fn normalize(raw: &str) -> Result<FixProposal> {
    let candidate = extract_json_object(raw)
        .ok_or_else(|| FaultlineError::ModelOutputInvalid("no JSON object found in model output".into()))?;
    serde_json::from_str(candidate).map_err(|e| FaultlineError::ModelOutputInvalid(e.to_string()))
}
