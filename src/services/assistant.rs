//! # Assistant Service
//!
//! Relays free-text prompts to an external language model and returns its
//! answer verbatim. The model sits behind [`AssistantProvider`]; the HTTP
//! provider speaks the OpenAI-compatible chat-completions protocol.
//!
//! Calls are bounded by the configured timeout and never retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::AssistantConfig;
use crate::error::{ProcessMiningError, Result};

/// Something that can answer a prompt
#[async_trait]
pub trait AssistantProvider: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

/// Chat-completions client over HTTP
#[derive(Debug, Clone)]
pub struct HttpAssistantProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    system_prompt: String,
    timeout: Duration,
}

impl HttpAssistantProvider {
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProcessMiningError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            system_prompt: config.system_prompt.clone(),
            timeout,
        })
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ProcessMiningError {
        if error.is_timeout() {
            ProcessMiningError::UpstreamTimeout {
                timeout_ms: self.timeout_ms(),
            }
        } else {
            ProcessMiningError::Upstream(format!("Assistant request failed: {error}"))
        }
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &self.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProcessMiningError::Upstream(format!(
                "Assistant returned HTTP {status}"
            )));
        }

        let reply: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_transport_error(e)
            } else {
                ProcessMiningError::Upstream(format!("Malformed assistant reply: {e}"))
            }
        })?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProcessMiningError::Upstream("Assistant reply contained no message".to_string())
            })
    }
}

#[async_trait]
impl AssistantProvider for HttpAssistantProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.send(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ProcessMiningError::UpstreamTimeout {
                timeout_ms: self.timeout_ms(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub response: String,
}

/// Front door for assistant prompts; `None` provider means disabled
#[derive(Debug, Clone, Default)]
pub struct AssistantService {
    provider: Option<Arc<dyn AssistantProvider>>,
}

impl AssistantService {
    pub fn new(provider: Arc<dyn AssistantProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }
        let provider = HttpAssistantProvider::from_config(config)?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn ask(&self, prompt: &str) -> Result<AssistantReply> {
        if prompt.trim().is_empty() {
            return Err(ProcessMiningError::validation("prompt must not be empty"));
        }

        let provider = self.provider.as_ref().ok_or_else(|| {
            ProcessMiningError::ServiceUnavailable("Assistant is disabled".to_string())
        })?;

        debug!(provider = provider.name(), prompt_chars = prompt.len(), "Forwarding prompt");
        match provider.complete(prompt).await {
            Ok(response) => Ok(AssistantReply { response }),
            Err(error) => {
                warn!(provider = provider.name(), error = %error, "Assistant call failed");
                Err(error)
            }
        }
    }
}
