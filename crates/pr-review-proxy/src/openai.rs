//! OpenAI-compatible chat completions client

use log::{debug, error};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 4000;

const SYSTEM_PROMPT: &str = "\
You are a code reviewer. Give meaningful, concrete improvements in a copy-pasteable form.

Before suggesting anything, read the existing comments and documentation. Do not ask for \
documentation that is already there.

Structure the answer as one section per changed file, each starting with a line \
`### File: <path>`, followed by a numbered list of suggestions with code examples. \
Finish with a section starting with `### Overall`.

Prioritise security vulnerabilities, performance bottlenecks, error handling and edge cases, \
architecture problems and anti-patterns. Skip style nits, formatting and subjective preferences.";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream response had no completion")]
    EmptyCompletion,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Ask for a review of `diff` and return the raw completion text
    pub async fn review(&self, diff: &str) -> Result<String, UpstreamError> {
        let prompt = format!(
            "Please review this code diff and provide detailed, file-specific suggestions \
             with examples. Focus on concrete improvements for each file:\n\n{diff}"
        );
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!("Requesting review from {} ({})", self.api_url, self.model);
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Completions API error {}: {}", status, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(UpstreamError::EmptyCompletion)
    }
}
