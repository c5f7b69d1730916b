#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chat proxy to a third-party LLM.
//!
//! Forwards a single user message to Anthropic Claude or any
//! `OpenAI`-compatible chat completion endpoint (`OpenAI` itself, Ollama,
//! vLLM, llama.cpp, LM Studio via `AI_BASE_URL`) and returns the reply
//! text. There is no conversation history and no retry; callers decide
//! how to surface failures.

pub mod providers;

use std::time::Duration;

use strum_macros::{Display, EnumString};
use thiserror::Error;

pub use providers::ChatProvider;

/// System prompt sent with every message.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for a neighborhood safety \
    dashboard. The dashboard maps crime counts per neighborhood, recent incident \
    hotspots, and nearby hospitals. Answer questions concisely and avoid speculation \
    about individuals.";

/// Default request timeout for upstream calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while proxying a chat message.
#[derive(Debug, Error)]
pub enum ChatError {
    /// HTTP request to the provider failed (network error or timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider response could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider returned a non-success status.
    #[error("Provider error: {message}")]
    Provider {
        /// Upstream error message.
        message: String,
    },

    /// The provider returned no text.
    #[error("Provider returned an empty reply")]
    EmptyResponse,

    /// Missing or invalid configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Which upstream API to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ProviderKind {
    /// `OpenAI` chat completions, or any compatible server.
    #[strum(to_string = "openai", serialize = "gpt")]
    OpenAi,
    /// Anthropic messages API.
    #[strum(to_string = "anthropic", serialize = "claude")]
    Anthropic,
}

/// Resolved provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Upstream API.
    pub kind: ProviderKind,
    /// API key. May be empty for local `OpenAI`-compatible servers.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Base URL override.
    pub base_url: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ChatSettings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ChatSettings::from_lookup`].
    pub fn from_env() -> Result<Self, ChatError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`.
    ///
    /// If `AI_PROVIDER` is set, uses that provider. Otherwise
    /// auto-detects from available credentials:
    ///
    /// 1. `ANTHROPIC_API_KEY` set -> Anthropic
    /// 2. `OPENAI_API_KEY` or `AI_BASE_URL` set -> `OpenAI`-compatible
    ///
    /// `AI_MODEL` overrides the default model and `AI_TIMEOUT_SECS` the
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Config`] if no credentials are found, the
    /// provider name is unknown, or the selected provider's key is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ChatError> {
        let kind = match lookup("AI_PROVIDER") {
            Some(name) => name.trim().parse().map_err(|_| ChatError::Config {
                message: format!("Unknown AI provider: {name}. Use 'anthropic' or 'openai'."),
            })?,
            None => detect_provider(&lookup)?,
        };

        let base_url = lookup("AI_BASE_URL").filter(|s| !s.trim().is_empty());

        let api_key = match kind {
            ProviderKind::Anthropic => {
                lookup("ANTHROPIC_API_KEY").ok_or_else(|| ChatError::Config {
                    message: "ANTHROPIC_API_KEY environment variable not set".to_string(),
                })?
            }
            ProviderKind::OpenAi => match lookup("OPENAI_API_KEY") {
                Some(key) => key,
                // Local OpenAI-compatible servers usually need no key.
                None if base_url.is_some() => String::new(),
                None => {
                    return Err(ChatError::Config {
                        message: "OPENAI_API_KEY environment variable not set".to_string(),
                    });
                }
            },
        };

        let default_model = match kind {
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::OpenAi => "gpt-4o-mini",
        };
        let model = lookup("AI_MODEL").unwrap_or_else(|| default_model.to_string());

        let timeout = match lookup("AI_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!("Ignoring invalid AI_TIMEOUT_SECS={raw:?}");
                    DEFAULT_TIMEOUT
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            kind,
            api_key,
            model,
            base_url,
            timeout,
        })
    }
}

fn detect_provider(lookup: &impl Fn(&str) -> Option<String>) -> Result<ProviderKind, ChatError> {
    if lookup("ANTHROPIC_API_KEY").is_some() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return Ok(ProviderKind::Anthropic);
    }

    if lookup("OPENAI_API_KEY").is_some() || lookup("AI_BASE_URL").is_some() {
        log::info!("Auto-detected AI provider: OpenAI-compatible");
        return Ok(ProviderKind::OpenAi);
    }

    Err(ChatError::Config {
        message: "No AI credentials detected. Set ANTHROPIC_API_KEY, OPENAI_API_KEY, \
                  or AI_BASE_URL, or set AI_PROVIDER explicitly."
            .to_string(),
    })
}

/// Builds the provider described by `settings`.
///
/// # Errors
///
/// Returns [`ChatError::Http`] if the HTTP client cannot be constructed.
pub fn create_provider(settings: ChatSettings) -> Result<Box<dyn ChatProvider>, ChatError> {
    let client = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()?;

    log::info!(
        "Chat provider: {} (model {}, timeout {}s)",
        settings.kind,
        settings.model,
        settings.timeout.as_secs()
    );

    let provider: Box<dyn ChatProvider> = match settings.kind {
        ProviderKind::OpenAi => Box::new(providers::openai::OpenAiProvider::new(
            client,
            settings.api_key,
            settings.model,
            settings.base_url,
        )),
        ProviderKind::Anthropic => Box::new(providers::anthropic::AnthropicProvider::new(
            client,
            settings.api_key,
            settings.model,
            settings.base_url,
        )),
    };

    Ok(provider)
}

/// Creates a chat provider from environment variables.
///
/// # Errors
///
/// Returns [`ChatError`] if no provider is configured or the client
/// cannot be built.
pub fn create_provider_from_env() -> Result<Box<dyn ChatProvider>, ChatError> {
    create_provider(ChatSettings::from_env()?)
}
