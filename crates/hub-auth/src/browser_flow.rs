use std::time::{Duration, Instant};

use crate::error::AuthError;

/// Query parameters a sign-in page may use to hand back the Google ID token.
const TOKEN_PARAM_NAMES: [&str; 2] = ["id_token", "credential"];

/// Run the browser half of federated sign-in and return the Google ID token.
///
/// 1. Start `tiny_http` on `127.0.0.1:0` (random port)
/// 2. Open the browser at `sign_in_url` with `redirect_uri` and `state`
/// 3. Wait for the callback in `spawn_blocking` (`tiny_http::recv` blocks)
///
/// The caller exchanges the token with the identity provider.
///
/// # Errors
///
/// Returns `AuthError::BrowserFlowFailed` if the server cannot bind, the
/// callback state does not match, or the callback times out.
pub async fn federated_id_token(sign_in_url: &str, timeout: Duration) -> Result<String, AuthError> {
    let server = tiny_http::Server::http("127.0.0.1:0")
        .map_err(|e| AuthError::BrowserFlowFailed(format!("failed to bind: {e}")))?;
    let port = server
        .server_addr()
        .to_ip()
        .map(|a| a.port())
        .ok_or_else(|| AuthError::BrowserFlowFailed("no port".into()))?;

    let state = csrf_state()?;
    let redirect_uri = format!("http://127.0.0.1:{port}/callback");
    let separator = if sign_in_url.contains('?') { '&' } else { '?' };
    let url = format!(
        "{sign_in_url}{separator}redirect_uri={redirect}&state={state}",
        redirect = urlencoding::encode(&redirect_uri)
    );

    eprintln!("Opening browser to: {url}");
    if let Err(error) = open::that(&url) {
        eprintln!("Failed to open browser: {error}");
        eprintln!("Open the URL above manually, then return here.");
    }

    tokio::task::spawn_blocking(move || wait_for_callback(&server, timeout, &state))
        .await
        .map_err(|e| AuthError::BrowserFlowFailed(format!("spawn_blocking join: {e}")))?
}

/// 16 random bytes, hex encoded.
fn csrf_state() -> Result<String, AuthError> {
    let mut nonce = [0u8; 16];
    getrandom::fill(&mut nonce)
        .map_err(|e| AuthError::BrowserFlowFailed(format!("failed to generate CSRF nonce: {e}")))?;
    Ok(nonce.iter().map(|b| format!("{b:02x}")).collect())
}

#[derive(Debug, PartialEq, Eq)]
enum Callback {
    Token(String),
    StateMismatch,
    /// No token yet, e.g. an intermediate redirect.
    Pending,
}

fn parse_callback_query(query: &str, expected_state: &str) -> Result<Callback, AuthError> {
    let mut token: Option<String> = None;
    let mut state: Option<String> = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let decoded = || {
            urlencoding::decode(value)
                .map(std::borrow::Cow::into_owned)
                .map_err(|e| AuthError::BrowserFlowFailed(format!("URL decode: {e}")))
        };
        if TOKEN_PARAM_NAMES.contains(&key) {
            token = Some(decoded()?);
        } else if key == "state" {
            state = Some(decoded()?);
        }
    }

    Ok(match token {
        Some(_) if state.as_deref() != Some(expected_state) => Callback::StateMismatch,
        Some(token) if !token.is_empty() => Callback::Token(token),
        _ => Callback::Pending,
    })
}

fn html(body: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let response = tiny_http::Response::from_string(format!("<html><body>{body}</body></html>"));
    match tiny_http::Header::from_bytes("Content-Type", "text/html") {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

/// Block until the callback server receives the token.
///
/// Requests other than `/callback?...` (favicon, preflight) are answered with
/// 204 and ignored.
fn wait_for_callback(
    server: &tiny_http::Server,
    timeout: Duration,
    expected_state: &str,
) -> Result<String, AuthError> {
    let deadline = Instant::now() + timeout;
    let timed_out = || {
        AuthError::BrowserFlowFailed(format!("browser callback timed out after {}s", timeout.as_secs()))
    };

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(timed_out());
        }

        let request = match server.recv_timeout(remaining) {
            Ok(Some(req)) => req,
            Ok(None) => return Err(timed_out()),
            Err(e) => return Err(AuthError::BrowserFlowFailed(format!("recv error: {e}"))),
        };

        let url = request.url().to_string();
        let Some(query) = url.strip_prefix("/callback?") else {
            let _ = request.respond(tiny_http::Response::from_string("").with_status_code(204));
            continue;
        };

        match parse_callback_query(query, expected_state)? {
            Callback::Token(token) => {
                let _ = request.respond(html("<h1>Signed in!</h1><p>You can close this tab.</p>"));
                return Ok(token);
            }
            Callback::StateMismatch => {
                let _ = request.respond(html("<h1>Sign-in failed</h1><p>State mismatch. Check the terminal.</p>"));
                return Err(AuthError::BrowserFlowFailed("state mismatch, possible CSRF".into()));
            }
            Callback::Pending => {
                let _ = request.respond(html("<h1>Waiting for sign-in…</h1><p>Redirecting, please wait.</p>"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_state_is_32_hex_chars() {
        let state = csrf_state().unwrap();
        assert_eq!(state.len(), 32);
        assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(state, csrf_state().unwrap());
    }

    #[test]
    fn callback_with_matching_state_yields_token() {
        let parsed = parse_callback_query("id_token=eyJ%2Babc&state=s1", "s1").unwrap();
        assert_eq!(parsed, Callback::Token("eyJ+abc".into()));
    }

    #[test]
    fn credential_param_is_accepted() {
        let parsed = parse_callback_query("state=s1&credential=tok", "s1").unwrap();
        assert_eq!(parsed, Callback::Token("tok".into()));
    }

    #[test]
    fn mismatched_or_missing_state_is_rejected() {
        assert_eq!(
            parse_callback_query("id_token=tok&state=other", "s1").unwrap(),
            Callback::StateMismatch
        );
        assert_eq!(parse_callback_query("id_token=tok", "s1").unwrap(), Callback::StateMismatch);
    }

    #[test]
    fn callback_without_token_keeps_waiting() {
        assert_eq!(parse_callback_query("state=s1&step=2", "s1").unwrap(), Callback::Pending);
        assert_eq!(parse_callback_query("", "s1").unwrap(), Callback::Pending);
    }
}
