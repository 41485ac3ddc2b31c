//! Bounded text previews for log output.
//!
//! Persisted records always keep full text; previews exist only so a
//! story body does not flood the console.

/// Preview length used for log lines.
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

/// Truncate `text` to at most `max_chars` characters for display.
///
/// Cuts on a character boundary and marks the cut with an ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}
