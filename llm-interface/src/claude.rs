use crate::LlmProvider;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use trendscout_core::{AppConfig, CoreError, LlmError};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "claude";

pub const CLAUDE_TIMEOUT_SECS: u64 = 60;
pub const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first content block. A block without text reads as `{}`.
    pub fn first_text(&self) -> Result<String, LlmError> {
        let block = self
            .content
            .first()
            .ok_or_else(|| LlmError::InvalidResponseFormat {
                provider: PROVIDER.to_string(),
            })?;
        Ok(block.text.clone().unwrap_or_else(|| "{}".to_string()))
    }
}

pub struct ClaudeProvider {
    api_key: Option<String>,
    model: String,
    http: Client,
    base_url: String,
}

impl ClaudeProvider {
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(CLAUDE_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_key: config.claude_api_key.clone(),
            model: config.claude_model.clone(),
            http,
            base_url: ANTHROPIC_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    pub fn build_request(&self, prompt: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message::user(prompt)],
        }
    }

    async fn send(&self, request: &MessagesRequest) -> Result<MessagesResponse, CoreError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::InvalidApiKey {
                provider: PROVIDER.to_string(),
            })?;
        let start_time = Instant::now();

        debug!(model = %request.model, "Claude messages request");
        let response = self
            .http
            .post(self.messages_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Network error calling Claude: {}", e);
                if e.is_timeout() {
                    CoreError::Llm(LlmError::RequestTimeout {
                        provider: PROVIDER.to_string(),
                    })
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Claude API error ({}): {}", status, body);
            return Err(CoreError::Llm(status_error(status)));
        }

        let parsed = response.json::<MessagesResponse>().await.map_err(|e| {
            error!("Failed to parse Claude response: {}", e);
            CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: PROVIDER.to_string(),
            })
        })?;
        info!("Claude answered in {:?}", start_time.elapsed());
        Ok(parsed)
    }
}

fn status_error(status: StatusCode) -> LlmError {
    let provider = PROVIDER.to_string();
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed { provider },
        429 => LlmError::RateLimited { provider },
        code if status.is_server_error() => LlmError::ServiceUnavailable {
            provider,
            status_code: code,
        },
        code => LlmError::RequestRejected {
            provider,
            status_code: code,
        },
    }
}

impl LlmProvider for ClaudeProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, prompt: &str) -> Result<String, CoreError> {
        let request = self.build_request(prompt);
        let response = self.send(&request).await?;
        Ok(response.first_text()?)
    }
}
