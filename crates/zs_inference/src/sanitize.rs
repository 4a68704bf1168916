use crate::error::{SummaryError, ERROR_MARKER_PREFIX};

/// Phrases a backend produces when it asks for input instead of summarizing.
pub const FALLBACK_PHRASES: [&str; 3] = ["please provide the text", "need the excerpt", "paste it here"];

/// Shorter sanitized output is treated as noise.
pub const MIN_SUMMARY_CHARS: usize = 10;

/// Replace everything but ASCII letters, digits and spaces with a space,
/// collapse whitespace runs and trim.
pub fn clean_text(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_error_marker(raw: &str) -> bool {
    raw.starts_with(ERROR_MARKER_PREFIX)
}

pub fn contains_fallback_phrase(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FALLBACK_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

/// Normalize a raw model response, returning an empty string when it is an
/// error marker, a request for more input, or too short to carry information.
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() || is_error_marker(raw) {
        return String::new();
    }

    let cleaned = clean_text(raw);
    if contains_fallback_phrase(&cleaned) || cleaned.chars().count() < MIN_SUMMARY_CHARS {
        return String::new();
    }
    cleaned
}

pub fn sanitize_response(response: &Result<String, SummaryError>) -> String {
    match response {
        Ok(text) => sanitize(text),
        Err(_) => String::new(),
    }
}
