use thiserror::Error;
use zs_core::{SearchHit, SearchResults};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid input.")]
    NotANumber,

    #[error("Invalid choice.")]
    OutOfRange,

    #[error("Entry '{0}' could not be opened.")]
    InvalidEntry(String),
}

/// Numbered result lines, starting at 1.
pub fn listing(results: &SearchResults) -> Vec<String> {
    results
        .hits
        .iter()
        .enumerate()
        .map(|(i, hit)| format!("{}. {}", i + 1, hit))
        .collect()
}

/// Resolve a 1-based choice typed by the user against the listed hits.
pub fn select<'a>(hits: &'a [SearchHit], choice: &str) -> Result<&'a SearchHit, SelectionError> {
    let choice = choice.trim();
    if choice.is_empty() || !choice.chars().all(|c| c.is_ascii_digit()) {
        return Err(SelectionError::NotANumber);
    }
    let number: usize = choice.parse().map_err(|_| SelectionError::OutOfRange)?;

    let hit = number
        .checked_sub(1)
        .and_then(|idx| hits.get(idx))
        .ok_or(SelectionError::OutOfRange)?;
    if hit.title.is_none() {
        return Err(SelectionError::InvalidEntry(hit.path.clone()));
    }
    Ok(hit)
}
