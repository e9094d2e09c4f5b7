// src/utils/text.rs

/// Replaces each line break with a single space and trims the result.
pub fn collapse_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

/// Trims `text`, mapping a blank result to `None`.
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
