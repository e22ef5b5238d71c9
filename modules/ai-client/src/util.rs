use crate::error::{AiError, Result};

/// Truncate a string to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Take the first candidate of a generation, trimmed of surrounding whitespace.
pub fn first_candidate(candidates: Vec<String>, provider: &'static str) -> Result<String> {
    candidates
        .into_iter()
        .next()
        .map(|text| text.trim().to_string())
        .ok_or(AiError::EmptyResponse(provider))
}
