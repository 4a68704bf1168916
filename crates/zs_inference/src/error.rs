use thiserror::Error;

/// Every string rendering of a [`SummaryError`] starts with this tag.
pub const ERROR_MARKER_PREFIX: &str = "[Error";

/// Failure of one summarization request. The `Display` form is the error
/// marker that stands in for the missing response text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("[Error: cleaned text empty]")]
    EmptyInput,

    #[error("[Error: backend returned an empty or fallback response]")]
    DegenerateResponse,

    #[error("[Error: backend error: {0}]")]
    Backend(String),

    #[error("[Error: request timed out]")]
    RequestTimeout,

    #[error("[Error: text too small after halving]")]
    TextTooSmall,

    #[error("[Error: unable to generate summary from the article]")]
    NoUsableSummaries,
}

impl SummaryError {
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryError::EmptyInput => "empty-input",
            SummaryError::DegenerateResponse => "degenerate-response",
            SummaryError::Backend(_) => "backend-error",
            SummaryError::RequestTimeout => "request-timeout",
            SummaryError::TextTooSmall => "text-too-small",
            SummaryError::NoUsableSummaries => "no-usable-summaries",
        }
    }
}
