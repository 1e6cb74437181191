use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use carmatch_core::config::{LlmConfig, LlmProvider};
use carmatch_core::domain::conversation::ConversationMessage;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Single-shot chat completion: a system prompt plus the transcript in, the
/// assistant text out. No streaming and no retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, messages: &[ConversationMessage]) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

fn chat_messages<'a>(
    system: &'a str,
    messages: &'a [ConversationMessage],
) -> Vec<ChatMessage<'a>> {
    std::iter::once(ChatMessage { role: "system", content: system })
        .chain(messages.iter().map(|message| ChatMessage {
            role: message.role.as_str(),
            content: message.content.as_str(),
        }))
        .collect()
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .context("failed to build HTTP client")
}

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        api_key: SecretString,
        base_url: Option<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let base_url = base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string());
        Ok(Self {
            http: http_client(timeout_secs)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, system: &str, messages: &[ConversationMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = OpenAiRequest { model: &self.model, messages: chat_messages(system, messages) };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("chat completion request failed")?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "chat completion response received");
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("chat completion returned {status}: {detail}");
        }

        let payload: OpenAiResponse =
            response.json().await.context("chat completion response was not valid JSON")?;
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("chat completion response had no message content"))
    }
}

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Deserialize)]
struct OllamaMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let base_url = base_url.into();
        Ok(Self {
            http: http_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, system: &str, messages: &[ConversationMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let body = OllamaRequest {
            model: &self.model,
            messages: chat_messages(system, messages),
            stream: false,
        };

        let response =
            self.http.post(&url).json(&body).send().await.context("ollama request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("ollama returned {status}: {detail}");
        }

        let payload: OllamaResponse =
            response.json().await.context("ollama response was not valid JSON")?;
        Ok(payload.message.content)
    }
}

pub fn client_from_config(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    match config.provider {
        LlmProvider::OpenAi => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| anyhow!("llm.api_key is required for the openai provider"))?;
            Ok(Arc::new(OpenAiClient::new(
                api_key,
                config.base_url.clone(),
                config.model.clone(),
                config.timeout_secs,
            )?))
        }
        LlmProvider::Ollama => {
            let base_url = config
                .base_url
                .clone()
                .ok_or_else(|| anyhow!("llm.base_url is required for the ollama provider"))?;
            Ok(Arc::new(OllamaClient::new(base_url, config.model.clone(), config.timeout_secs)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use carmatch_core::config::{LlmConfig, LlmProvider};
    use carmatch_core::domain::conversation::ConversationMessage;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{client_from_config, LlmClient, OllamaClient, OpenAiClient};

    fn transcript() -> Vec<ConversationMessage> {
        vec![
            ConversationMessage::assistant("שלום! אני דני"),
            ConversationMessage::user("אני צריך רכב משפחתי"),
        ]
    }

    #[tokio::test]
    async fn openai_sends_system_prompt_first_and_returns_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "persona"},
                    {"role": "assistant", "content": "שלום! אני דני"},
                    {"role": "user", "content": "אני צריך רכב משפחתי"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "כמה פעמים בשבוע?"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            OpenAiClient::new("sk-test".to_string().into(), Some(server.uri()), "gpt-4o", 5)
                .expect("client");
        let reply = client.complete("persona", &transcript()).await.expect("completion");

        assert_eq!(reply, "כמה פעמים בשבוע?");
    }

    #[tokio::test]
    async fn openai_error_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client =
            OpenAiClient::new("sk-test".to_string().into(), Some(server.uri()), "gpt-4o", 5)
                .expect("client");
        let error = client.complete("persona", &transcript()).await.expect_err("should fail");

        assert!(error.to_string().contains("500"));
    }

    #[tokio::test]
    async fn openai_without_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client =
            OpenAiClient::new("sk-test".to_string().into(), Some(server.uri()), "gpt-4o", 5)
                .expect("client");
        assert!(client.complete("persona", &transcript()).await.is_err());
    }

    #[tokio::test]
    async fn ollama_uses_non_streaming_chat_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({"model": "llama3.1", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.1",
                "message": {"role": "assistant", "content": "hello"},
                "done": true
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(server.uri(), "llama3.1", 5).expect("client");
        let reply = client.complete("persona", &transcript()).await.expect("completion");

        assert_eq!(reply, "hello");
    }

    #[test]
    fn openai_config_without_key_is_rejected() {
        let config = LlmConfig {
            provider: LlmProvider::OpenAi,
            api_key: None,
            base_url: None,
            model: "gpt-4o".to_string(),
            timeout_secs: 5,
        };

        assert!(client_from_config(&config).is_err());
    }
}
