use std::fmt;
use std::time::Duration;
use zs_core::{CompletionModel, Result};
use crate::prompts::excerpt_of;

/// Offline backend that answers with the first 20 words of the excerpt.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CompletionModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, prompt: &str, _timeout: Duration) -> Result<String> {
        let words: Vec<&str> = excerpt_of(prompt).split_whitespace().take(20).collect();
        Ok(words.join(" "))
    }
}
