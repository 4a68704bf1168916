use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use crate::Result;

#[async_trait]
pub trait CompletionModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Complete a single user prompt. Implementations report an exceeded
    /// `timeout` as `Error::Timeout` so callers can retry on it.
    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String>;
}
