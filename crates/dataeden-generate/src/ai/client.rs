use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use dataeden_core::RemoteFailure;

use crate::ai::AiSettings;
use crate::errors::GenerationError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

/// Minimal chat-completion client: one user message in, one text reply out.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    settings: AiSettings,
}

impl ChatClient {
    pub fn new(settings: AiSettings) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|err| GenerationError::remote(RemoteFailure::Unreachable, err.to_string()))?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    /// Send `prompt` and return the first choice's content, trimmed.
    pub async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            stream: false,
        };

        let response = self
            .http
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| GenerationError::remote(RemoteFailure::Unreachable, err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GenerationError::remote(RemoteFailure::Unreachable, err.to_string()))?;
        debug!(status = status.as_u16(), bytes = body.len(), "chat completion answered");

        if !status.is_success() {
            let code = status.as_u16();
            return Err(GenerationError::remote(
                RemoteFailure::from_status(code),
                status_message(code, &body),
            ));
        }

        extract_content(&body)
    }
}

fn extract_content(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|err| GenerationError::Protocol(format!("response is not valid JSON: {err}")))?;

    if let Some(error) = parsed.error {
        return Err(GenerationError::remote(
            RemoteFailure::Upstream,
            format!(
                "type: {}, message: {}",
                error.kind.as_deref().unwrap_or("unknown"),
                error.message.as_deref().unwrap_or("")
            ),
        ));
    }

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            GenerationError::Protocol("missing choices[0].message.content".to_string())
        })
}

fn status_message(status: u16, body: &str) -> String {
    match status {
        400 => "malformed request body; fix the request format".to_string(),
        401 => "authentication failed; check the API key".to_string(),
        402 => "insufficient account balance; top up the account".to_string(),
        422 => "invalid request parameters; check the model settings".to_string(),
        429 => "request rate limit reached; slow down".to_string(),
        500 => "internal server fault; retry later".to_string(),
        503 => "server overloaded; retry later".to_string(),
        other => format!("unexpected HTTP status {other}, body: {}", body.trim()),
    }
}
