//! Chat widget session.
//!
//! Keeps the transcript and resends it on every turn. A failed reply never
//! propagates: it is recorded as an error message in the transcript.

use std::sync::Arc;

use hub_core::entities::ChatMessage;

use crate::error::AiError;
use crate::generator::TextGenerator;

pub const GREETING: &str = "Hello! I'm the AfroTech Hub Assistant. How can I help you innovate today?";
pub const CONNECTION_ERROR: &str = "I'm having trouble connecting right now. Please try again later.";

/// A user message accepted by [`ChatSession::begin`], waiting for its reply.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    /// Transcript before the new message.
    pub history: Vec<ChatMessage>,
    pub text: String,
}

pub struct ChatSession<G: ?Sized> {
    generator: Arc<G>,
    transcript: Vec<ChatMessage>,
    in_flight: bool,
}

impl<G: TextGenerator + ?Sized> ChatSession<G> {
    #[must_use]
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            transcript: vec![ChatMessage::model(GREETING)],
            in_flight: false,
        }
    }

    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Record the user's message and mark the session busy.
    ///
    /// Returns `None` for blank input or while a reply is outstanding.
    pub fn begin(&mut self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() || self.in_flight {
            return None;
        }
        let history = self.transcript.clone();
        self.transcript.push(ChatMessage::user(text));
        self.in_flight = true;
        Some(PendingTurn {
            history,
            text: text.to_string(),
        })
    }

    /// Append the reply (or the error stand-in) and clear the busy flag.
    pub fn finish(&mut self, reply: Result<String, AiError>) -> &ChatMessage {
        self.in_flight = false;
        let message = match reply {
            Ok(text) => ChatMessage::model(text),
            Err(error) => {
                tracing::warn!(%error, "chat reply failed");
                ChatMessage::model_error(CONNECTION_ERROR)
            }
        };
        self.transcript.push(message);
        &self.transcript[self.transcript.len() - 1]
    }

    /// Send one message and wait for the reply.
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let turn = self.begin(text)?;
        let reply = self.generator.send_chat_message(&turn.history, &turn.text).await;
        Some(self.finish(reply))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use hub_core::enums::ChatRole;

    use super::*;

    /// Echoes the message and records the history length it was sent.
    #[derive(Default)]
    struct EchoGenerator {
        fail: bool,
        seen_history: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn send_chat_message(&self, history: &[ChatMessage], text: &str) -> Result<String, AiError> {
            self.seen_history.lock().unwrap().push(history.len());
            if self.fail {
                return Err(AiError::Api {
                    status: 503,
                    message: "overloaded".into(),
                });
            }
            Ok(format!("echo: {text}"))
        }

        async fn draft_message(&self, topic: &str) -> Result<String, AiError> {
            Ok(format!("draft about {topic}"))
        }
    }

    #[test]
    fn transcript_opens_with_greeting() {
        let chat = ChatSession::new(Arc::new(EchoGenerator::default()));
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.transcript()[0].text, GREETING);
        assert_eq!(chat.transcript()[0].role, ChatRole::Model);
    }

    #[tokio::test]
    async fn each_turn_resends_full_history() {
        let generator = Arc::new(EchoGenerator::default());
        let mut chat = ChatSession::new(Arc::clone(&generator));

        let reply = chat.send("What apps do you build?").await.unwrap();
        assert_eq!(reply.text, "echo: What apps do you build?");
        chat.send("Tell me about Nebula").await.unwrap();

        assert_eq!(*generator.seen_history.lock().unwrap(), vec![1, 3]);
        assert_eq!(chat.transcript().len(), 5);
    }

    #[tokio::test]
    async fn failure_becomes_error_message() {
        let generator = Arc::new(EchoGenerator {
            fail: true,
            ..EchoGenerator::default()
        });
        let mut chat = ChatSession::new(generator);
        let reply = chat.send("hello").await.unwrap();
        assert!(reply.is_error);
        assert_eq!(reply.text, CONNECTION_ERROR);
        assert!(!chat.is_in_flight());
    }

    #[test]
    fn second_message_is_gated_while_in_flight() {
        let mut chat = ChatSession::new(Arc::new(EchoGenerator::default()));
        assert!(chat.begin("first").is_some());
        assert!(chat.is_in_flight());
        assert!(chat.begin("second").is_none());
        chat.finish(Ok("reply".into()));
        assert!(chat.begin("third").is_some());
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut chat = ChatSession::new(Arc::new(EchoGenerator::default()));
        assert!(chat.send("   ").await.is_none());
        assert_eq!(chat.transcript().len(), 1);
    }
}
