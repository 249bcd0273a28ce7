//! HTTP client for the enemy's LLM
//!
//! Talks to the Anthropic messages API or any OpenAI-compatible chat
//! endpoint (DeepSeek, OpenAI, local servers), picked from the URL. Replies
//! from either family are read through one untagged enum. Every caller has
//! a rules-based fallback, so all failures surface as `LlmError`.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SkirmishError};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// An enemy turn has to be decided well within a human's patience
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// A turn decision is a short JSON object
const MAX_DECISION_TOKENS: u32 = 512;

/// Wire dialect of the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAiCompatible,
}

impl Provider {
    fn for_url(url: &str) -> Self {
        if url.contains("anthropic.com") {
            Provider::Anthropic
        } else {
            Provider::OpenAiCompatible
        }
    }
}

pub struct LlmClient {
    http: Client,
    api_key: String,
    api_url: String,
    model: String,
    provider: Provider,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(llm_error)?;
        let provider = Provider::for_url(&api_url);
        Ok(Self {
            http,
            api_key,
            api_url,
            model,
            provider,
        })
    }

    /// Configure from `LLM_API_KEY` (required), `LLM_API_URL` and `LLM_MODEL`
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("LLM_API_KEY").map_err(|_| SkirmishError::LlmError("LLM_API_KEY not set".into()))?;
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Self::new(api_key, api_url, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user exchange and return the reply text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let response = self.request(system, user).send().await.map_err(llm_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SkirmishError::LlmError(format!("API error {}: {}", status, body)));
        }

        let reply: Reply = response.json().await.map_err(llm_error)?;
        reply.into_text()
    }

    fn request(&self, system: &str, user: &str) -> RequestBuilder {
        let post = self.http.post(&self.api_url).json(&self.body(system, user));
        match self.provider {
            Provider::Anthropic => post
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            Provider::OpenAiCompatible => post.bearer_auth(&self.api_key),
        }
    }

    /// Anthropic takes the system prompt as a field, chat APIs as a message
    fn body<'a>(&'a self, system: &'a str, user: &'a str) -> CompletionRequest<'a> {
        let user = Message { role: "user", content: user };
        let (system, messages) = match self.provider {
            Provider::Anthropic => (Some(system), vec![user]),
            Provider::OpenAiCompatible => (
                None,
                vec![
                    Message {
                        role: "system",
                        content: system,
                    },
                    user,
                ],
            ),
        };
        CompletionRequest {
            model: &self.model,
            max_tokens: MAX_DECISION_TOKENS,
            system,
            messages,
        }
    }
}

fn llm_error(e: reqwest::Error) -> SkirmishError {
    SkirmishError::LlmError(e.to_string())
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Either provider's response body
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply {
    Anthropic { content: Vec<TextBlock> },
    Chat { choices: Vec<Choice> },
}

#[derive(Debug, Deserialize)]
struct TextBlock {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl Reply {
    fn into_text(self) -> Result<String> {
        let text = match self {
            Reply::Anthropic { content } => content.into_iter().next().map(|block| block.text),
            Reply::Chat { choices } => choices.into_iter().next().map(|choice| choice.message.content),
        };
        text.filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SkirmishError::LlmError("Empty response".into()))
    }
}
