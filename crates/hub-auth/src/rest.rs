//! Identity Toolkit REST adapter.
//!
//! Talks to the hosted identity service over its REST API:
//!
//! | operation                | endpoint                                      |
//! |--------------------------|-----------------------------------------------|
//! | `check_existence`        | `accounts:createAuthUri`                      |
//! | `sign_in`                | `accounts:signInWithPassword` + `accounts:lookup` |
//! | `register`               | `accounts:signUp` + `accounts:update` + `accounts:sendOobCode` |
//! | `sign_in_federated`      | browser callback + `accounts:signInWithIdp`   |
//! | `request_password_reset` | `accounts:sendOobCode` (`PASSWORD_RESET`)      |
//! | `reload_account`         | secure-token refresh + `accounts:lookup`      |
//!
//! Profile documents are read and written through the injected
//! [`ProfileStore`]; every session is given one before it is broadcast. The
//! refresh token is persisted with [`token_store`] when credential
//! persistence is enabled.
//!
//! Once `signUp` succeeds the account exists, so registration treats the
//! display-name update and the verification email as best effort.
//!
//! [`token_store`]: crate::token_store

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use hub_config::IdentityConfig;
use hub_core::Account;
use hub_store::ProfileStore;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;

use crate::error::AuthError;
use crate::http::check_response;
use crate::provider::{ExistenceStatus, IdentityProvider, IdentitySession};
use crate::session::{ensure_profile, resolve_account};

const PASSWORD_PROVIDER: &str = "password";
const GOOGLE_PROVIDER: &str = "google.com";

/// Tokens of the signed-in session.
#[derive(Clone)]
struct Credentials {
    id_token: String,
    refresh_token: String,
    identity: IdentitySession,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAuthUriResponse {
    #[serde(default)]
    registered: bool,
    #[serde(default)]
    signin_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    /// Present on `signInWithIdp` only.
    #[serde(default)]
    email_verified: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

impl From<LookupUser> for IdentitySession {
    fn from(user: LookupUser) -> Self {
        Self {
            account_id: user.local_id,
            email: user.email,
            display_name: user.display_name,
            email_verified: user.email_verified,
        }
    }
}

fn classify(response: &CreateAuthUriResponse) -> ExistenceStatus {
    let has = |method: &str| response.signin_methods.iter().any(|m| m == method);
    if has(PASSWORD_PROVIDER) {
        ExistenceStatus::Exists
    } else if has(GOOGLE_PROVIDER) {
        ExistenceStatus::GoogleOnly
    } else if response.registered {
        ExistenceStatus::Exists
    } else {
        ExistenceStatus::New
    }
}

pub struct RestIdentityProvider {
    http: reqwest::Client,
    config: IdentityConfig,
    profiles: Arc<dyn ProfileStore>,
    persist_credentials: bool,
    credentials: Mutex<Option<Credentials>>,
    changes: broadcast::Sender<Option<IdentitySession>>,
}

impl RestIdentityProvider {
    /// Build the adapter. Credential persistence is off until
    /// [`with_persisted_credentials`](Self::with_persisted_credentials).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotConfigured` without an API key, or
    /// `AuthError::Http` if the HTTP client cannot be built.
    pub fn new(
        config: IdentityConfig,
        timeout: Duration,
        profiles: Arc<dyn ProfileStore>,
    ) -> Result<Self, AuthError> {
        if !config.is_configured() {
            return Err(AuthError::NotConfigured("identity.api_key"));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("afrotech-hub/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let (changes, _) = broadcast::channel(16);
        Ok(Self {
            http,
            config,
            profiles,
            persist_credentials: false,
            credentials: Mutex::new(None),
            changes,
        })
    }

    /// Store the refresh token across runs (keychain, then file).
    #[must_use]
    pub const fn with_persisted_credentials(mut self) -> Self {
        self.persist_credentials = true;
        self
    }

    /// Restore the previous session from the stored refresh token.
    ///
    /// A stale or revoked token is deleted and treated as signed out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on transport failures.
    pub async fn restore(&self) -> Result<Option<IdentitySession>, AuthError> {
        let Some(refresh_token) = crate::token_store::load() else {
            return Ok(None);
        };
        match self.refresh(&refresh_token).await {
            Ok((id_token, refresh_token)) => {
                let identity = self.lookup(&id_token).await?;
                ensure_profile(self.profiles.as_ref(), &identity, None).await;
                self.set_credentials(Some(Credentials {
                    id_token,
                    refresh_token,
                    identity: identity.clone(),
                }))?;
                tracing::debug!(account = %identity.account_id, "session restored");
                Ok(Some(identity))
            }
            Err(AuthError::Api { status, message }) if (400..500).contains(&status) => {
                tracing::warn!(status, %message, "stored session rejected; signing out");
                crate::token_store::delete()?;
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}?key={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key)
        )
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<T, AuthError> {
        let resp = self.http.post(self.endpoint(method)).json(body).send().await?;
        let resp = check_response(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| AuthError::Parse(format!("accounts:{method}: {e}")))
    }

    async fn lookup(&self, id_token: &str) -> Result<IdentitySession, AuthError> {
        let resp: LookupResponse = self.post("lookup", &json!({ "idToken": id_token })).await?;
        resp.users
            .into_iter()
            .next()
            .map(IdentitySession::from)
            .ok_or_else(|| AuthError::Parse("accounts:lookup returned no user".into()))
    }

    /// Exchange a refresh token for a fresh ID token.
    async fn refresh(&self, refresh_token: &str) -> Result<(String, String), AuthError> {
        let url = format!(
            "{}?key={}",
            self.config.token_url,
            urlencoding::encode(&self.config.api_key)
        );
        let resp = self
            .http
            .post(url)
            .json(&json!({ "grant_type": "refresh_token", "refresh_token": refresh_token }))
            .send()
            .await?;
        let body: RefreshResponse = check_response(resp)
            .await?
            .json()
            .await
            .map_err(|e| AuthError::Parse(format!("token refresh: {e}")))?;
        Ok((body.id_token, body.refresh_token))
    }

    fn lock(&self) -> MutexGuard<'_, Option<Credentials>> {
        self.credentials.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn id_token(&self) -> Result<String, AuthError> {
        self.lock()
            .as_ref()
            .map(|c| c.id_token.clone())
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Replace the session, persist it, and broadcast the change.
    ///
    /// A failure to store a new token only costs the next run its session, so
    /// it is logged. A failure to delete the stored token is an error.
    fn set_credentials(&self, credentials: Option<Credentials>) -> Result<(), AuthError> {
        if self.persist_credentials {
            match &credentials {
                Some(c) => {
                    if let Err(error) = crate::token_store::store(&c.refresh_token) {
                        tracing::warn!(%error, "could not persist session; it ends with this process");
                    }
                }
                None => crate::token_store::delete()?,
            }
        }
        let identity = credentials.as_ref().map(|c| c.identity.clone());
        *self.lock() = credentials;
        let _ = self.changes.send(identity);
        Ok(())
    }

    /// Resolve the identity, give it a profile document, then install and
    /// broadcast the session.
    async fn start_session(&self, tokens: TokenResponse, verified: Option<bool>) -> Result<IdentitySession, AuthError> {
        let name = tokens.display_name.clone();
        let identity = match verified {
            Some(email_verified) => IdentitySession {
                account_id: tokens.local_id,
                email: tokens.email,
                display_name: tokens.display_name,
                email_verified,
            },
            None => self.lookup(&tokens.id_token).await?,
        };
        ensure_profile(self.profiles.as_ref(), &identity, name.as_deref()).await;
        self.set_credentials(Some(Credentials {
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            identity: identity.clone(),
        }))?;
        Ok(identity)
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn check_existence(&self, email: &str) -> Result<ExistenceStatus, AuthError> {
        let resp: CreateAuthUriResponse = self
            .post(
                "createAuthUri",
                &json!({ "identifier": email, "continueUri": "http://localhost" }),
            )
            .await?;
        Ok(classify(&resp))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let tokens: TokenResponse = self
            .post(
                "signInWithPassword",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        let identity = self.start_session(tokens, None).await?;
        Ok(resolve_account(self.profiles.as_ref(), &identity).await)
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        let tokens: TokenResponse = self
            .post(
                "signUp",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        tracing::info!(account = %tokens.local_id, "account registered");

        if let Err(error) = self
            .post::<serde_json::Value>(
                "update",
                &json!({ "idToken": tokens.id_token, "displayName": name, "returnSecureToken": false }),
            )
            .await
        {
            tracing::warn!(account = %tokens.local_id, %error, "could not set display name");
        }
        if let Err(error) = self
            .post::<serde_json::Value>(
                "sendOobCode",
                &json!({ "requestType": "VERIFY_EMAIL", "idToken": tokens.id_token }),
            )
            .await
        {
            tracing::warn!(account = %tokens.local_id, %error, "verification email not sent; it can be resent");
        }

        let tokens = TokenResponse {
            display_name: Some(name.to_string()),
            ..tokens
        };
        self.start_session(tokens, Some(false)).await?;
        Ok(())
    }

    async fn sign_in_federated(&self) -> Result<Account, AuthError> {
        if !self.config.supports_federated() {
            return Err(AuthError::NotConfigured("identity.federated_sign_in_url"));
        }
        let sign_in_url = self.config.federated_sign_in_url.as_str();
        let timeout = Duration::from_secs(self.config.callback_timeout_secs);
        let google_token = crate::browser_flow::federated_id_token(sign_in_url, timeout).await?;

        let post_body = format!(
            "id_token={}&providerId={GOOGLE_PROVIDER}",
            urlencoding::encode(&google_token)
        );
        let tokens: TokenResponse = self
            .post(
                "signInWithIdp",
                &json!({
                    "postBody": post_body,
                    "requestUri": "http://localhost",
                    "returnIdpCredential": true,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        let verified = tokens.email_verified;
        let identity = self.start_session(tokens, verified).await?;
        Ok(resolve_account(self.profiles.as_ref(), &identity).await)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let _: serde_json::Value = self
            .post("sendOobCode", &json!({ "requestType": "PASSWORD_RESET", "email": email }))
            .await?;
        Ok(())
    }

    async fn resend_verification(&self) -> Result<(), AuthError> {
        let id_token = self.id_token()?;
        let _: serde_json::Value = self
            .post("sendOobCode", &json!({ "requestType": "VERIFY_EMAIL", "idToken": id_token }))
            .await?;
        Ok(())
    }

    async fn reload_account(&self) -> Result<Account, AuthError> {
        let refresh_token = self
            .lock()
            .as_ref()
            .map(|c| c.refresh_token.clone())
            .ok_or(AuthError::NotAuthenticated)?;
        let (id_token, refresh_token) = self.refresh(&refresh_token).await?;
        let identity = self.lookup(&id_token).await?;
        ensure_profile(self.profiles.as_ref(), &identity, None).await;
        self.set_credentials(Some(Credentials {
            id_token,
            refresh_token,
            identity: identity.clone(),
        }))?;
        Ok(resolve_account(self.profiles.as_ref(), &identity).await)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_credentials(None)
    }

    fn session_changes(&self) -> broadcast::Receiver<Option<IdentitySession>> {
        self.changes.subscribe()
    }

    fn current_session(&self) -> Option<IdentitySession> {
        self.lock().as_ref().map(|c| c.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_store::HubDb;
    use rstest::rstest;

    fn auth_uri(registered: bool, methods: &[&str]) -> CreateAuthUriResponse {
        CreateAuthUriResponse {
            registered,
            signin_methods: methods.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    #[rstest]
    #[case(false, &[], ExistenceStatus::New)]
    #[case(true, &["password"], ExistenceStatus::Exists)]
    #[case(true, &["google.com", "password"], ExistenceStatus::Exists)]
    #[case(true, &["google.com"], ExistenceStatus::GoogleOnly)]
    #[case(true, &[], ExistenceStatus::Exists)]
    fn classifies_sign_in_methods(
        #[case] registered: bool,
        #[case] methods: &[&str],
        #[case] expected: ExistenceStatus,
    ) {
        assert_eq!(classify(&auth_uri(registered, methods)), expected);
    }

    #[test]
    fn create_auth_uri_response_parses_camel_case() {
        let resp: CreateAuthUriResponse =
            serde_json::from_str(r#"{"kind":"x","registered":true,"signinMethods":["google.com"]}"#).unwrap();
        assert_eq!(classify(&resp), ExistenceStatus::GoogleOnly);
    }

    #[test]
    fn lookup_user_maps_to_session() {
        let resp: LookupResponse = serde_json::from_str(
            r#"{"users":[{"localId":"uid-9","email":"a@x.com","emailVerified":true,"displayName":"Ada"}]}"#,
        )
        .unwrap();
        let session: IdentitySession = resp.users.into_iter().next().unwrap().into();
        assert_eq!(session.account_id, "uid-9");
        assert!(session.email_verified);
        assert_eq!(session.display_name.as_deref(), Some("Ada"));
    }

    async fn provider(base_url: &str) -> RestIdentityProvider {
        let profiles = Arc::new(HubDb::open_local(":memory:").await.unwrap());
        let config = IdentityConfig {
            api_key: "key with space".into(),
            base_url: base_url.into(),
            ..IdentityConfig::default()
        };
        RestIdentityProvider::new(config, Duration::from_secs(5), profiles).unwrap()
    }

    #[tokio::test]
    async fn endpoint_encodes_key_and_trims_slash() {
        let provider = provider("https://identity.example.com/v1/").await;
        assert_eq!(
            provider.endpoint("lookup"),
            "https://identity.example.com/v1/accounts:lookup?key=key%20with%20space"
        );
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let profiles = Arc::new(HubDb::open_local(":memory:").await.unwrap());
        let err = RestIdentityProvider::new(IdentityConfig::default(), Duration::from_secs(5), profiles)
            .err()
            .unwrap();
        assert!(matches!(err, AuthError::NotConfigured("identity.api_key")));
    }

    #[tokio::test]
    async fn signed_out_provider_refuses_session_calls() {
        let provider = provider("https://identity.example.com/v1").await;
        assert!(provider.current_session().is_none());
        assert!(matches!(
            provider.resend_verification().await.unwrap_err(),
            AuthError::NotAuthenticated
        ));
        assert!(matches!(
            provider.reload_account().await.unwrap_err(),
            AuthError::NotAuthenticated
        ));
    }

    #[tokio::test]
    async fn sign_out_broadcasts_none() {
        let provider = provider("https://identity.example.com/v1").await;
        let mut rx = provider.session_changes();
        provider.sign_out().await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), None);
    }

    /// Serve canned `accounts:*` replies on a random local port. Each route is
    /// `(method, status, body)`; the server stops after a second of silence.
    fn identity_server(routes: Vec<(&'static str, u16, &'static str)>) -> String {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        std::thread::spawn(move || {
            while let Ok(Some(request)) = server.recv_timeout(Duration::from_secs(1)) {
                let url = request.url().to_string();
                let (status, body) = routes
                    .iter()
                    .find(|(method, _, _)| url.contains(&format!("accounts:{method}?")))
                    .map_or((404, r#"{"error":{"message":"NOT_FOUND"}}"#), |(_, status, body)| {
                        (*status, *body)
                    });
                let response = tiny_http::Response::from_string(body).with_status_code(status);
                let _ = request.respond(response);
            }
        });
        format!("http://127.0.0.1:{port}/v1")
    }

    struct OfflineProfiles;

    #[async_trait]
    impl ProfileStore for OfflineProfiles {
        async fn get_profile(
            &self,
            _account_id: &str,
        ) -> Result<Option<hub_core::entities::Profile>, hub_store::error::StoreError> {
            Err(hub_store::error::StoreError::Query("offline".into()))
        }

        async fn put_profile(
            &self,
            _profile: &hub_core::entities::Profile,
        ) -> Result<(), hub_store::error::StoreError> {
            Err(hub_store::error::StoreError::Query("offline".into()))
        }
    }

    fn config(base_url: String) -> IdentityConfig {
        IdentityConfig {
            api_key: "test-key".into(),
            base_url,
            ..IdentityConfig::default()
        }
    }

    const SIGN_UP: &str = r#"{"localId":"uid-1","email":"new@x.com","idToken":"id-1","refreshToken":"rt-1"}"#;

    #[tokio::test]
    async fn register_succeeds_when_side_steps_fail() {
        let base_url = identity_server(vec![
            ("signUp", 200, SIGN_UP),
            ("update", 500, r#"{"error":{"message":"INTERNAL"}}"#),
            ("sendOobCode", 400, r#"{"error":{"message":"TOO_MANY_ATTEMPTS_TRY_LATER"}}"#),
        ]);
        let profiles = Arc::new(HubDb::open_local(":memory:").await.unwrap());
        let provider = RestIdentityProvider::new(config(base_url), Duration::from_secs(5), profiles.clone()).unwrap();
        let mut rx = provider.session_changes();

        provider.register("New", "new@x.com", "secret1").await.unwrap();

        let session = rx.recv().await.unwrap().unwrap();
        assert_eq!(session.account_id, "uid-1");
        assert!(!session.email_verified);
        assert_eq!(provider.current_session(), Some(session));
        let profile = profiles.get_profile("uid-1").await.unwrap().unwrap();
        assert_eq!(profile.name, "New");
    }

    #[tokio::test]
    async fn register_with_offline_profile_store_still_starts_session() {
        let base_url = identity_server(vec![
            ("signUp", 200, SIGN_UP),
            ("update", 200, "{}"),
            ("sendOobCode", 200, "{}"),
        ]);
        let provider =
            RestIdentityProvider::new(config(base_url), Duration::from_secs(5), Arc::new(OfflineProfiles)).unwrap();

        provider.register("New", "new@x.com", "secret1").await.unwrap();
        let session = provider.current_session().unwrap();
        assert_eq!(session.display_name.as_deref(), Some("New"));
    }

    #[tokio::test]
    async fn sign_in_creates_missing_profile_before_broadcast() {
        let base_url = identity_server(vec![
            ("signInWithPassword", 200, r#"{"localId":"uid-7","email":"ada@x.com","idToken":"id-7","refreshToken":"rt-7"}"#),
            ("lookup", 200, r#"{"users":[{"localId":"uid-7","email":"ada@x.com","emailVerified":true}]}"#),
        ]);
        let profiles = Arc::new(HubDb::open_local(":memory:").await.unwrap());
        let provider = RestIdentityProvider::new(config(base_url), Duration::from_secs(5), profiles.clone()).unwrap();
        let mut rx = provider.session_changes();

        let account = provider.sign_in("ada@x.com", "secret1").await.unwrap();
        assert!(account.email_verified);
        assert_eq!(account.name, "ada");

        rx.recv().await.unwrap().unwrap();
        let profile = profiles.get_profile("uid-7").await.unwrap();
        assert!(profile.is_some(), "profile exists by the time the session is announced");
        assert!(resolve_account(profiles.as_ref(), &provider.current_session().unwrap()).await.email_verified);
    }

    #[tokio::test]
    async fn wrong_password_maps_to_invalid_credential() {
        let base_url = identity_server(vec![(
            "signInWithPassword",
            400,
            r#"{"error":{"code":400,"message":"INVALID_LOGIN_CREDENTIALS"}}"#,
        )]);
        let profiles = Arc::new(HubDb::open_local(":memory:").await.unwrap());
        let provider = RestIdentityProvider::new(config(base_url), Duration::from_secs(5), profiles).unwrap();
        assert!(matches!(
            provider.sign_in("ada@x.com", "nope").await.unwrap_err(),
            AuthError::InvalidCredential
        ));
        assert!(provider.current_session().is_none());
    }
}
