//! External reasoning-service client.
//!
//! The recommendation synthesizer talks to a chat-completion endpoint
//! through the [`ReasoningService`] trait so tests (and the local fallback
//! path) never need network access. A missing credential is a normal
//! "not configured" condition, not an error: [`OpenAiService::from_env`]
//! simply returns `None` and the synthesizer runs its deterministic
//! fallback.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const COMPLETION_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the reasoning-service credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// A stateless completion call against an external reasoning service.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Sends one system + user prompt pair and returns the raw text reply.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
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
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

/// Reasoning service backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiService {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl OpenAiService {
    /// Creates a client with the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(COMPLETION_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        OpenAiService {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_API_URL.to_string(),
            http,
        }
    }

    /// Builds a client from `OPENAI_API_KEY`, or `None` when the credential
    /// is absent (the expected "not configured" state).
    pub fn from_env() -> Option<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Some(OpenAiService::new(key)),
            _ => {
                log::warn!("{API_KEY_ENV} not set; AI recommendations disabled");
                None
            }
        }
    }

}

#[async_trait]
impl ReasoningService for OpenAiService {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Reasoning service error ({status}): {body}"));
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Reasoning service returned no content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_deserialization() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"SEO|High|a|b"}}]}"#;
        let reply: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            reply.choices[0].message.content.as_deref(),
            Some("SEO|High|a|b")
        );
    }

    #[test]
    fn test_chat_request_serialization_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "system",
                content: "you are a consultant",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
    }
}
