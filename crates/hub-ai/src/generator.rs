use async_trait::async_trait;
use hub_core::entities::ChatMessage;

use crate::error::AiError;

/// The generative-text collaborator.
///
/// Neither call keeps conversation state; the caller resends the history
/// every turn.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Reply to `text`, given the earlier turns in `history`.
    async fn send_chat_message(&self, history: &[ChatMessage], text: &str) -> Result<String, AiError>;

    /// Draft a short contact message about `topic`.
    async fn draft_message(&self, topic: &str) -> Result<String, AiError>;
}
