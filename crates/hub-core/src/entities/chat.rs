use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ChatRole;

/// One message in the assistant chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Set on model messages that stand in for a failed reply.
    #[serde(default)]
    pub is_error: bool,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            timestamp: Utc::now(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
            timestamp: Utc::now(),
            is_error: false,
        }
    }

    #[must_use]
    pub fn model_error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::model(text)
        }
    }
}
