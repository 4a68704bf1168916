use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use zs_core::{CompletionModel, Error, Result};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_MODEL: &str = "nvidia/nemotron-nano-12b-v2-vl:free";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Reasoning {
    enabled: bool,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<Reasoning>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

/// First choice's text. A missing `content` is an empty answer, not an error.
fn first_content(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::Inference("OpenRouter response has no choices".to_string()))?;
    Ok(choice.message.content.unwrap_or_default())
}

fn truncate_body(body: &str) -> String {
    body.trim().chars().take(200).collect()
}

pub struct OpenRouterModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    reasoning: bool,
}

impl OpenRouterModel {
    pub fn new(api_key: Option<String>, model_name: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Inference("OpenRouter API key is required (set OPENROUTER_API_KEY or pass --api-key)".to_string())
            })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: model_name.unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            reasoning: true,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_reasoning(mut self, enabled: bool) -> Self {
        self.reasoning = enabled;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            reasoning: self.reasoning.then_some(Reasoning { enabled: true }),
        }
    }
}

impl fmt::Debug for OpenRouterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("reasoning", &self.reasoning)
            .finish()
    }
}

#[async_trait]
impl CompletionModel for OpenRouterModel {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| Error::from_http(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "OpenRouter returned {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let body = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::from_http(e, timeout))?;
        first_content(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_key_is_required() {
        assert!(matches!(OpenRouterModel::new(None, None), Err(Error::Inference(_))));
        assert!(OpenRouterModel::new(Some("  ".to_string()), None).is_err());

        let model = OpenRouterModel::new(Some("sk-or-test".to_string()), None).unwrap();
        assert_eq!(model.model(), DEFAULT_OPENROUTER_MODEL);
        assert!(!format!("{:?}", model).contains("sk-or-test"));
    }

    #[test]
    fn test_request_body() {
        let model = OpenRouterModel::new(Some("key".to_string()), Some("some/model".to_string())).unwrap();
        let body = serde_json::to_value(model.request("Summarize this")).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "some/model",
                "messages": [{"role": "user", "content": "Summarize this"}],
                "reasoning": {"enabled": true}
            })
        );

        let model = model.with_reasoning(false);
        let body = serde_json::to_value(model.request("x")).unwrap();
        assert!(body.get("reasoning").is_none());
    }

    #[test]
    fn test_first_content() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "gen-1",
            "choices": [{"message": {"role": "assistant", "content": "The tower is tall."}}]
        }))
        .unwrap();
        assert_eq!(first_content(response).unwrap(), "The tower is tall.");

        let response: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"role": "assistant", "content": null}}]})).unwrap();
        assert_eq!(first_content(response).unwrap(), "");

        let response: ChatResponse = serde_json::from_value(json!({"error": {"code": 429}})).unwrap();
        assert!(matches!(first_content(response), Err(Error::Inference(_))));
    }
}
