//! Response checks for the identity REST API.
//!
//! Non-success responses carry `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`.
//! The codes the auth flow distinguishes are mapped to dedicated
//! [`AuthError`] variants; everything else becomes [`AuthError::Api`].

use serde::Deserialize;

use crate::error::AuthError;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Check an HTTP response for error conditions and return it unchanged on
/// success.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    if resp.status() == 429 {
        return Err(AuthError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(map_error_body(status, &body));
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

/// Map an error body to an [`AuthError`].
///
/// Messages may carry detail after the code (`"WEAK_PASSWORD : Password
/// should be at least 6 characters"`); only the leading code is matched.
fn map_error_body(status: u16, body: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());
    let code = message.split([' ', ':']).next().unwrap_or_default();
    match code {
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" => {
            AuthError::InvalidCredential
        }
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        _ => AuthError::Api { status, message },
    }
}
