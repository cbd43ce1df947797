//! Generative assistant reached through the backend's intermediary endpoint
//!
//! The request and reply follow the `generateContent` shape of the upstream
//! provider; the provider key stays on the intermediary.

use crate::client::{decode_json, CampusClient};
use campus_core::{config_error, CampusResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantRequest {
    pub contents: Vec<Content>,
}

impl AssistantRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantReply {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl AssistantReply {
    /// Text of the first part of the first candidate, if any
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
            .filter(|t| !t.trim().is_empty())
    }
}

impl CampusClient {
    /// Send a prompt to the assistant and return the raw reply text
    pub async fn generate(&self, prompt: &str) -> CampusResult<Option<String>> {
        let operation = "assistant_generate";
        let endpoint = self
            .config()
            .assistant_endpoint
            .clone()
            .ok_or_else(|| config_error!("No assistant endpoint configured", "assistant"))?;

        debug!(%endpoint, prompt_len = prompt.len(), "Assistant request");
        let mut request = self
            .http()
            .post(&endpoint)
            .json(&AssistantRequest::from_prompt(prompt));
        if let Some(token) = self.credentials().access_token() {
            request = request.bearer_auth(token);
        }

        let response = self.send(request, operation).await?;
        let reply: AssistantReply = decode_json(response, operation).await?;
        Ok(reply.text().map(str::to_string))
    }
}
