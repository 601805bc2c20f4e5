//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use hub_config::GeminiConfig;
use hub_core::entities::ChatMessage;
use hub_core::enums::ChatRole;
use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::generator::TextGenerator;
use crate::http::check_response;

/// Substituted when the API answers without any text.
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response at the moment.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

impl<'a> Content<'a> {
    const fn turn(role: ChatRole, text: &'a str) -> Self {
        Self {
            role: Some(role.as_str()),
            parts: [Part { text }],
        }
    }
}

/// Build the `contents` array for a chat turn.
///
/// Error stand-ins are never sent back, and the conversation must open with a
/// user turn, so leading model messages (the greeting) are dropped.
fn chat_contents<'a>(history: &'a [ChatMessage], text: &'a str) -> Vec<Content<'a>> {
    history
        .iter()
        .filter(|m| !m.is_error)
        .skip_while(|m| m.role == ChatRole::Model)
        .map(|m| Content::turn(m.role, &m.text))
        .chain(std::iter::once(Content::turn(ChatRole::User, text)))
        .collect()
}

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
    site_name: String,
    system_instruction: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns `AiError::NotConfigured` without an API key, or `AiError::Http`
    /// if the HTTP client cannot be built.
    pub fn new(
        config: GeminiConfig,
        site_name: impl Into<String>,
        system_instruction: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        if !config.is_configured() {
            return Err(AiError::NotConfigured("gemini.api_key"));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("afrotech-hub/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            site_name: site_name.into(),
            system_instruction: system_instruction.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, AiError> {
        tracing::debug!(model = %self.config.model, turns = request.contents.len(), "generateContent");
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;
        let body: GenerateResponse = check_response(resp)
            .await?
            .json()
            .await
            .map_err(|e| AiError::Parse(format!("generateContent: {e}")))?;
        let text = body.text();
        if text.trim().is_empty() {
            tracing::warn!("generateContent returned no text");
            return Ok(EMPTY_REPLY.to_string());
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn send_chat_message(&self, history: &[ChatMessage], text: &str) -> Result<String, AiError> {
        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: [Part {
                    text: &self.system_instruction,
                }],
            }),
            contents: chat_contents(history, text),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };
        self.generate(&request).await
    }

    async fn draft_message(&self, topic: &str) -> Result<String, AiError> {
        let prompt = crate::prompt::contact_draft_prompt(&self.site_name, topic);
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::turn(ChatRole::User, &prompt)],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };
        Ok(self.generate(&request).await?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client() -> GeminiClient {
        let config = GeminiConfig {
            api_key: "test-key".into(),
            ..GeminiConfig::default()
        };
        GeminiClient::new(config, "AfroTech Hub", "be nice", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn endpoint_names_model() {
        assert_eq!(
            client().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn unconfigured_client_is_rejected() {
        let err = GeminiClient::new(GeminiConfig::default(), "x", "y", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, AiError::NotConfigured("gemini.api_key")));
    }

    #[test]
    fn request_serializes_to_wire_shape() {
        let history = vec![
            ChatMessage::model("Hello!"),
            ChatMessage::user("What is Nebula?"),
            ChatMessage::model("An analytics dashboard."),
            ChatMessage::user("Pricing?"),
            ChatMessage::model_error("I'm having trouble connecting right now."),
        ];
        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: [Part { text: "be nice" }],
            }),
            contents: chat_contents(&history, "Is it open source?"),
            generation_config: GenerationConfig { temperature: 0.5 },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "systemInstruction": { "parts": [{ "text": "be nice" }] },
                "contents": [
                    { "role": "user", "parts": [{ "text": "What is Nebula?" }] },
                    { "role": "model", "parts": [{ "text": "An analytics dashboard." }] },
                    { "role": "user", "parts": [{ "text": "Pricing?" }] },
                    { "role": "user", "parts": [{ "text": "Is it open source?" }] },
                ],
                "generationConfig": { "temperature": 0.5 },
            })
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let body: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "there" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(body.text(), "Hello there");
    }

    #[test]
    fn blocked_response_has_no_text() {
        let body: GenerateResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } })).unwrap();
        assert_eq!(body.text(), "");
    }
}
