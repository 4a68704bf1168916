use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;
use zs_core::{CompletionModel, Error, Result};
use super::InferenceConfig;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/gemma3:12b";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:12b";
const DEFAULT_OLLAMA_PORT: u16 = 11434;
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Ollama endpoint written as `scheme://host:port/model`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    host: String,
    port: u16,
    model_name: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_string(),
            port: DEFAULT_OLLAMA_PORT,
            model_name: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}

impl OllamaConfig {
    pub fn from_url(raw: &str) -> Result<Self> {
        let parsed = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?;

        let model_name = parsed.path().trim_start_matches('/').to_string();

        Ok(Self {
            host: format!("{}://{}", parsed.scheme(), parsed.host_str().unwrap_or("localhost")),
            port: parsed.port().unwrap_or(DEFAULT_OLLAMA_PORT),
            model_name: if model_name.is_empty() {
                DEFAULT_OLLAMA_MODEL.to_string()
            } else {
                model_name
            },
        })
    }

    /// `--model-name` wins over the model in the URL path.
    pub fn from_inference_config(config: &InferenceConfig) -> Result<Self> {
        let mut ollama = match &config.model_url {
            Some(url) => Self::from_url(url)?,
            None => Self::default(),
        };
        if let Some(name) = &config.model_name {
            ollama.model_name = name.clone();
        }
        Ok(ollama)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn base_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

pub struct OllamaModel {
    client: Client,
    config: OllamaConfig,
}

impl fmt::Debug for OllamaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaModel")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl OllamaModel {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Builds the model and checks that the server answers.
    pub async fn connect(config: OllamaConfig) -> Result<Self> {
        let model = Self::new(config);
        model.probe().await?;
        Ok(model)
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    async fn probe(&self) -> Result<()> {
        let unavailable = |reason: String| {
            Error::Inference(format!(
                "Ollama is not available at {}: {}. Please ensure Ollama is running and the model '{}' is installed.",
                self.config.base_url(),
                reason,
                self.config.model_name()
            ))
        };

        let response = self
            .client
            .get(format!("{}/api/tags", self.config.base_url()))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(response.status().to_string()));
        }

        let tags = response
            .json::<TagsResponse>()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        if has_model(&tags, self.config.model_name()) {
            info!("🦙 Ollama is serving {}", self.config.model_name());
        } else {
            warn!("Model '{}' is not installed on {}", self.config.model_name(), self.config.base_url());
        }
        Ok(())
    }
}

fn has_model(tags: &TagsResponse, model_name: &str) -> bool {
    tags.models.iter().any(|m| {
        m.name == model_name || (!model_name.contains(':') && m.name == format!("{}:latest", model_name))
    })
}

#[async_trait]
impl CompletionModel for OllamaModel {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model_name(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url()))
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_http(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!("Ollama returned {}: {}", status, body.trim())));
        }

        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::from_http(e, timeout))?;
        Ok(body.message.content)
    }
}
