use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use zs_core::{CompletionModel, Error, Result};

pub mod dummy;
pub mod ollama;
pub mod openrouter;

use dummy::DummyModel;
use ollama::{OllamaConfig, OllamaModel};
use openrouter::OpenRouterModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    #[default]
    OpenRouter,
    Ollama,
    Dummy,
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Ok(ModelKind::OpenRouter),
            "ollama" => Ok(ModelKind::Ollama),
            "dummy" => Ok(ModelKind::Dummy),
            _ => Err(Error::Inference(format!(
                "Unknown model: {}. Available models: openrouter, ollama, dummy",
                s
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::OpenRouter => "openrouter",
            ModelKind::Ollama => "ollama",
            ModelKind::Dummy => "dummy",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub kind: ModelKind,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub model_url: Option<String>,
    /// Ask OpenRouter for reasoning tokens. Ignored by other backends.
    pub reasoning: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::default(),
            api_key: None,
            model_name: None,
            model_url: None,
            reasoning: true,
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("model_url", &self.model_url)
            .field("reasoning", &self.reasoning)
            .finish()
    }
}

pub async fn create_model(config: &InferenceConfig) -> Result<Arc<dyn CompletionModel>> {
    let model: Arc<dyn CompletionModel> = match config.kind {
        ModelKind::OpenRouter => Arc::new(
            OpenRouterModel::new(config.api_key.clone(), config.model_name.clone())?
                .with_reasoning(config.reasoning),
        ),
        ModelKind::Ollama => {
            let ollama = OllamaConfig::from_inference_config(config)?;
            info!("🔌 Connecting to Ollama at {}", ollama.base_url());
            Arc::new(OllamaModel::connect(ollama).await?)
        }
        ModelKind::Dummy => Arc::new(DummyModel::new()),
    };
    Ok(model)
}
