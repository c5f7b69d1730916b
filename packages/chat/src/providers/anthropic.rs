//! Anthropic Claude provider implementation.

use serde::{Deserialize, Serialize};

use super::{ChatProvider, join_reply};
use crate::{ChatError, SYSTEM_PROMPT};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude API provider.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider. `base_url` defaults to
    /// [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        model: String,
        base_url: Option<String>,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

/// Anthropic API request body.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [AnthropicMessage<'a>; 1],
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Anthropic API response body.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

fn build_request<'a>(model: &'a str, message: &'a str) -> AnthropicRequest<'a> {
    AnthropicRequest {
        model,
        max_tokens: 1024,
        system: SYSTEM_PROMPT,
        messages: [AnthropicMessage {
            role: "user",
            content: message,
        }],
    }
}

fn parse_response(status: reqwest::StatusCode, body: &str) -> Result<String, ChatError> {
    if !status.is_success() {
        let message = serde_json::from_str::<AnthropicError>(body)
            .map_or_else(|_| format!("HTTP {status}: {body}"), |e| e.error.message);
        return Err(ChatError::Provider { message });
    }

    let response: AnthropicResponse = serde_json::from_str(body)?;
    join_reply(response.content.iter().filter_map(|block| match block {
        AnthropicContentBlock::Text { text } => Some(text.as_str()),
        AnthropicContentBlock::Other => None,
    }))
}

#[async_trait::async_trait]
impl ChatProvider for AnthropicProvider {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&build_request(&self.model, message))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        parse_response(status, &body)
    }
}
