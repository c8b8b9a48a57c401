//! Bundle recovery from raw model text.
//!
//! The model may wrap its JSON payload in prose or code fences. Recovery is
//! a bounded state-machine scan for the first balanced `{...}` span (string-
//! and escape-aware), followed by a strict serde parse of that span. If no
//! balanced span exists or the span does not parse as a bundle, this fails
//! with [`ExtractError::Malformed`] rather than guessing -- the orchestrator
//! owns the fallback decision, not this module.

use formsmith_types::bundle::FormBundle;
use formsmith_types::error::ExtractError;

/// Recover a well-formed bundle from raw model text.
pub fn extract_bundle(raw: &str) -> Result<FormBundle, ExtractError> {
    let span = balanced_object_span(raw).ok_or(ExtractError::Malformed)?;
    serde_json::from_str(span).map_err(|_| ExtractError::Malformed)
}

/// Locate the first balanced top-level JSON object in `raw`.
///
/// Single linear pass. Brace depth is only counted outside JSON string
/// literals, and backslash escapes inside strings are honored, so payloads
/// containing `{`/`}` in field titles or follow-up text scan correctly.
/// Returns `None` when there is no `{` or the object never closes
/// (truncated output).
fn balanced_object_span(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    let start = raw.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
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
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
