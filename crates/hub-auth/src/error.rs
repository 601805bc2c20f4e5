use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not signed in; run `hub auth login`")]
    NotAuthenticated,

    #[error("invalid email or password")]
    InvalidCredential,

    #[error("an account with this email already exists")]
    EmailInUse,

    #[error("identity provider not configured: set {0}")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited; retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("browser sign-in failed: {0}")]
    BrowserFlowFailed(String),

    #[error("token store error: {0}")]
    TokenStoreError(String),

    #[error("profile store error: {0}")]
    Store(#[from] hub_store::error::StoreError),

    #[error("{0}")]
    Other(String),
}

/// User-facing classification of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    InvalidCredential,
    EmailInUse,
    /// Network failures, provider outages, and anything else.
    Unknown,
}

impl AuthError {
    #[must_use]
    pub const fn kind(&self) -> AuthErrorKind {
        match self {
            Self::InvalidCredential => AuthErrorKind::InvalidCredential,
            Self::EmailInUse => AuthErrorKind::EmailInUse,
            _ => AuthErrorKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_classifies_rejections() {
        assert_eq!(AuthError::InvalidCredential.kind(), AuthErrorKind::InvalidCredential);
        assert_eq!(AuthError::EmailInUse.kind(), AuthErrorKind::EmailInUse);
        assert_eq!(
            AuthError::Api { status: 503, message: String::new() }.kind(),
            AuthErrorKind::Unknown
        );
        assert_eq!(AuthError::NotAuthenticated.kind(), AuthErrorKind::Unknown);
    }
}
