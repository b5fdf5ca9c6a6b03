//! Bulk generation through a chat-completion model.
//!
//! One request per call: the prompt describes every column, the reply is
//! parsed as header-less CSV.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dataeden_core::{ColumnDescriptor, RemoteFailure, ValueGrid};

use crate::errors::GenerationError;
use crate::model::GenerationOutcome;

pub mod client;
pub mod prompt;
pub mod reply;

pub use client::ChatClient;

/// Endpoint and model settings for the AI engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.deepseek.com/chat/completions".to_string(),
            api_key: String::new(),
            model: "deepseek-chat".to_string(),
            max_tokens: 8192,
            temperature: 1.0,
            request_timeout_secs: 120,
        }
    }
}

impl AiSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// Engine that asks a model for the whole grid at once.
#[derive(Debug, Clone)]
pub struct AiBulkEngine {
    client: ChatClient,
}

impl AiBulkEngine {
    pub fn new(settings: AiSettings) -> Result<Self, GenerationError> {
        Ok(Self {
            client: ChatClient::new(settings)?,
        })
    }

    pub async fn generate(
        &self,
        table: &str,
        rows: usize,
        columns: &[ColumnDescriptor],
    ) -> Result<GenerationOutcome, GenerationError> {
        if !self.client.settings().is_configured() {
            return Err(GenerationError::remote(
                RemoteFailure::NotConfigured,
                "set ai.api_url and ai.api_key to use the AI engine",
            ));
        }
        if rows == 0 {
            return Ok(GenerationOutcome::default());
        }

        let request = prompt::build_prompt(table, rows, columns);
        debug!(prompt = %request, "ai prompt");
        info!(table, rows, columns = columns.len(), "requesting ai generation");

        let content = self.client.complete(&request).await?;
        info!(table, chars = content.len(), "ai reply received");

        let parsed = reply::parse_rows(&content, rows, columns.len());
        Ok(GenerationOutcome::new(
            ValueGrid::new(parsed.rows),
            parsed.warnings,
        ))
    }
}
