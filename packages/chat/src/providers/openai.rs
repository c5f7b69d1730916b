//! `OpenAI`-compatible chat completion provider.

use serde::{Deserialize, Serialize};

use super::{ChatProvider, join_reply};
use crate::{ChatError, SYSTEM_PROMPT};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` API provider.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new `OpenAI` provider. `base_url` defaults to
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

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: [OpenAiMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

fn build_request<'a>(model: &'a str, message: &'a str) -> OpenAiRequest<'a> {
    OpenAiRequest {
        model,
        messages: [
            OpenAiMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            OpenAiMessage {
                role: "user",
                content: message,
            },
        ],
        max_tokens: 1024,
    }
}

fn parse_response(status: reqwest::StatusCode, body: &str) -> Result<String, ChatError> {
    if !status.is_success() {
        let message = serde_json::from_str::<OpenAiError>(body)
            .map_or_else(|_| format!("HTTP {status}: {body}"), |e| e.error.message);
        return Err(ChatError::Provider { message });
    }

    let response: OpenAiResponse = serde_json::from_str(body)?;
    join_reply(
        response
            .choices
            .iter()
            .filter_map(|c| c.message.content.as_deref()),
    )
}

#[async_trait::async_trait]
impl ChatProvider for OpenAiProvider {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let mut request = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&build_request(&self.model, message));

        if !self.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        parse_response(status, &body)
    }
}
