use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use zs_core::{CompletionModel, Error};
use crate::error::SummaryError;
use crate::logging::Logger;
use crate::prompts::PromptTemplate;
use crate::sanitize::{clean_text, contains_fallback_phrase};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Degrade-and-retry policy applied when a request times out: the input is
/// cut down to `shrink_factor` of its length before each of at most
/// `max_retries` further attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub shrink_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::halving(DEFAULT_MAX_RETRIES)
    }
}

impl RetryPolicy {
    pub fn halving(max_retries: u32) -> Self {
        Self {
            max_retries,
            shrink_factor: 0.5,
        }
    }

    pub fn never() -> Self {
        Self::halving(0)
    }

    /// Prefix of `text` holding `floor(chars * shrink_factor)` chars. Always
    /// strictly shorter than a non-empty input.
    pub fn shrink<'a>(&self, text: &'a str) -> &'a str {
        let chars = text.chars().count();
        let keep = (chars as f64 * self.shrink_factor.clamp(0.0, 1.0)).floor() as usize;
        let keep = keep.min(chars.saturating_sub(1));
        match text.char_indices().nth(keep) {
            Some((offset, _)) => &text[..offset],
            None => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientConfig {
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// One summarization request against a completion backend.
pub struct SummaryClient {
    model: Arc<dyn CompletionModel>,
    config: ClientConfig,
}

impl fmt::Debug for SummaryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryClient")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .finish()
    }
}

impl SummaryClient {
    pub fn new(model: Arc<dyn CompletionModel>, config: ClientConfig) -> Self {
        Self { model, config }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        self.summarize_with(PromptTemplate::ChunkSummary, text).await
    }

    pub async fn summarize_with(&self, template: PromptTemplate, text: &str) -> Result<String, SummaryError> {
        self.summarize_logged(template, text, &Logger::new()).await
    }

    pub(crate) async fn summarize_logged(
        &self,
        template: PromptTemplate,
        text: &str,
        logger: &Logger,
    ) -> Result<String, SummaryError> {
        let retry = self.config.retry;
        let mut text = text;
        let mut cleaned = clean_text(text);
        if cleaned.is_empty() {
            logger.debug("Input cleaned to nothing, skipping request");
            return Err(SummaryError::EmptyInput);
        }

        let mut attempt = 0;
        loop {
            let prompt = template.render(&cleaned);
            logger.debug(&format!("Sending {} chars to {}", cleaned.len(), self.model.name()));

            match self.complete(&prompt).await {
                Ok(response) => {
                    let response = response.trim();
                    if response.is_empty() || contains_fallback_phrase(response) {
                        logger.warn("Backend returned an empty or fallback response");
                        return Err(SummaryError::DegenerateResponse);
                    }
                    return Ok(response.to_string());
                }
                Err(err) if err.is_timeout() => {
                    if attempt >= retry.max_retries {
                        logger.warn(&format!("Request timed out after {} attempts", attempt + 1));
                        return Err(SummaryError::RequestTimeout);
                    }
                    attempt += 1;
                    text = retry.shrink(text);
                    cleaned = clean_text(text);
                    if cleaned.is_empty() {
                        logger.warn("Request timed out and the shrunk text is empty");
                        return Err(SummaryError::TextTooSmall);
                    }
                    logger.warn(&format!(
                        "⏳ Request timed out, retrying {}/{} with {} chars",
                        attempt,
                        retry.max_retries,
                        cleaned.len()
                    ));
                }
                Err(err) => {
                    logger.error(&format!("Backend error: {}", err));
                    return Err(SummaryError::Backend(err.to_string()));
                }
            }
        }
    }

    async fn complete(&self, prompt: &str) -> zs_core::Result<String> {
        let timeout = self.config.request_timeout;
        match tokio::time::timeout(timeout, self.model.complete(prompt, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(timeout)),
        }
    }
}
