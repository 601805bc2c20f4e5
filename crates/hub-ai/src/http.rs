//! Shared HTTP response checks for the generative-language API.
//!
//! 429 becomes [`AiError::RateLimited`] (`Retry-After` seconds, 60 if absent);
//! any other non-success status becomes [`AiError::Api`] carrying
//! `error.message` from the JSON body when there is one.

use serde::Deserialize;

use crate::error::AiError;

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, AiError> {
    if resp.status() == 429 {
        return Err(AiError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        return Err(AiError::Api { status, message });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
