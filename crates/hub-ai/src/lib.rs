//! # hub-ai
//!
//! The AfroTech Hub assistant: a [`TextGenerator`] port, its Gemini
//! `generateContent` adapter, the prompt text, and the chat session behind
//! the chat widget.

pub mod chat;
mod error;
pub mod gemini;
pub mod generator;
mod http;
pub mod prompt;

pub use chat::ChatSession;
pub use error::AiError;
pub use gemini::GeminiClient;
pub use generator::TextGenerator;
