//! Generative-text error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// `error.message` from the response body, or the raw body.
        message: String,
    },

    /// The API returned 429 Too Many Requests.
    #[error("rate limited; retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("generative-text API not configured: set {0}")]
    NotConfigured(&'static str),
}
