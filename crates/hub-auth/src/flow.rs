//! Authentication wizard.
//!
//! ```text
//! email ──new──────────▶ register-details ──registered──▶ verify-email
//!   │  ──exists───────▶ password-login ──unverified────▶ verify-email
//!   │  ──google-only──▶ (stay, error)        │
//!   │                                        └──▶ forgot-password
//!   └─ federated sign-in ──verified──▶ exit
//! ```
//!
//! [`transition`] is a pure function from the current [`AuthFlowState`] and
//! an [`AuthEvent`] to the next state plus at most one [`AuthRequest`] for
//! the identity provider. [`AuthFlow`] drives it: it executes the request and
//! feeds the outcome back as [`AuthEvent::Settled`].
//!
//! Every request carries a [`Ticket`]. While one is pending, submissions are
//! ignored; navigating away abandons it, and a `Settled` with any other
//! ticket is dropped.

use std::fmt;
use std::sync::Arc;

use hub_core::Account;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::AuthErrorKind;
use crate::provider::{ExistenceStatus, IdentityProvider};

pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const MSG_GOOGLE_ONLY: &str = "This email uses Google Sign-In. Please use the Google button below.";
pub const MSG_FEDERATED_FAILED: &str = "Failed to sign in with Google. Please try again.";
pub const MSG_INCORRECT_PASSWORD: &str = "Incorrect password.";
pub const MSG_SIGN_IN_FAILED: &str = "Failed to sign in. Please try again.";
pub const MSG_NAME_REQUIRED: &str = "Please enter your name.";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters.";
pub const MSG_EMAIL_IN_USE: &str = "An account with this email already exists. Try signing in instead.";
pub const MSG_REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const MSG_EMAIL_REQUIRED: &str = "Please enter your email address.";
pub const MSG_RESET_SENT: &str = "Password reset link sent! Check your inbox.";
pub const MSG_RESET_FAILED: &str = "Failed to send reset email. Please verify the email address.";
pub const MSG_NOT_VERIFIED: &str = "Your email is not verified yet. Check your inbox for the link.";
pub const MSG_VERIFICATION_SENT: &str = "New verification link sent!";
pub const MSG_RESEND_FAILED: &str = "Failed to resend. Please try signing in again first.";

pub const MIN_PASSWORD_CHARS: usize = 6;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStep {
    #[default]
    Email,
    PasswordLogin,
    RegisterDetails,
    ForgotPassword,
    VerifyEmail,
}

impl AuthStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::PasswordLogin => "password-login",
            Self::RegisterDetails => "register-details",
            Self::ForgotPassword => "forgot-password",
            Self::VerifyEmail => "verify-email",
        }
    }

    /// Steps reachable through plain navigation links (no provider call).
    #[must_use]
    pub const fn links(self) -> &'static [Self] {
        match self {
            Self::PasswordLogin => &[Self::Email, Self::ForgotPassword],
            Self::RegisterDetails => &[Self::Email],
            Self::ForgotPassword => &[Self::PasswordLogin],
            Self::Email | Self::VerifyEmail => &[],
        }
    }
}

impl fmt::Display for AuthStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one provider request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    CheckExistence,
    SignIn,
    Register,
    SignInFederated,
    PasswordReset,
    ResendVerification,
    ReloadAccount,
    SignOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    ticket: Ticket,
    kind: RequestKind,
}

/// Wizard state. Mutated only through [`transition`].
#[derive(Clone, Default, PartialEq)]
pub struct AuthFlowState {
    step: AuthStep,
    email: String,
    password: Zeroizing<String>,
    name: String,
    error: Option<String>,
    success: Option<String>,
    pending: Option<Pending>,
    issued: u64,
    exited: Option<Account>,
}

impl fmt::Debug for AuthFlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthFlowState")
            .field("step", &self.step)
            .field("email", &self.email)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("name", &self.name)
            .field("error", &self.error)
            .field("success", &self.success)
            .field("pending", &self.pending)
            .field("exited", &self.exited.as_ref().map(|a| &a.id))
            .finish()
    }
}

impl AuthFlowState {
    /// Initial state for a freshly mounted flow.
    ///
    /// An existing unverified session starts at `verify-email`.
    #[must_use]
    pub fn for_session(account: Option<&Account>) -> Self {
        match account {
            Some(account) if !account.email_verified => Self {
                step: AuthStep::VerifyEmail,
                email: account.email.clone(),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Start directly at `step`, e.g. the `verify-email` step forced by the
    /// application session.
    #[must_use]
    pub fn at(step: AuthStep) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn step(&self) -> AuthStep {
        self.step
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Whether a provider request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// The verified account the flow exited with.
    #[must_use]
    pub const fn exited(&self) -> Option<&Account> {
        self.exited.as_ref()
    }

    fn enter(&mut self, step: AuthStep) {
        self.step = step;
        self.error = None;
        self.success = None;
    }

    fn fail(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.success = None;
    }

    fn succeed(&mut self, message: &str) {
        self.success = Some(message.to_string());
        self.error = None;
    }

    fn issue(&mut self, kind: RequestKind) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.pending = Some(Pending { ticket, kind });
        ticket
    }

    fn exit(&mut self, account: Account) {
        self.email.clear();
        self.password = Zeroizing::default();
        self.name.clear();
        self.error = None;
        self.success = None;
        self.exited = Some(account);
    }

    /// Back to a blank `email` step. Abandons any pending request.
    fn reset(&mut self) {
        let issued = self.issued;
        *self = Self {
            issued,
            ..Self::default()
        };
    }
}

// ---------------------------------------------------------------------------
// Events and requests
// ---------------------------------------------------------------------------

/// What the provider answered.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthReply {
    Existence(ExistenceStatus),
    Account(Account),
    Done,
}

pub type AuthOutcome = Result<AuthReply, AuthErrorKind>;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SubmitEmail(String),
    SubmitPassword(String),
    SubmitRegistration { name: String, password: String },
    /// Forgot-password form; the email field is pre-filled from the buffer.
    SubmitPasswordReset(String),
    FederatedSignIn,
    /// "I've verified".
    ConfirmVerified,
    ResendVerification,
    UseDifferentEmail,
    GoTo(AuthStep),
    Settled { ticket: Ticket, outcome: AuthOutcome },
}

impl AuthEvent {
    const fn is_submission(&self) -> bool {
        !matches!(self, Self::UseDifferentEmail | Self::GoTo(_) | Self::Settled { .. })
    }
}

/// A provider call issued by a transition.
#[derive(Clone, PartialEq)]
pub enum AuthRequest {
    CheckExistence { email: String },
    SignIn { email: String, password: Zeroizing<String> },
    Register { name: String, email: String, password: Zeroizing<String> },
    SignInFederated,
    RequestPasswordReset { email: String },
    ResendVerification,
    ReloadAccount,
    SignOut,
}

impl AuthRequest {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CheckExistence { .. } => "check_existence",
            Self::SignIn { .. } => "sign_in",
            Self::Register { .. } => "register",
            Self::SignInFederated => "sign_in_federated",
            Self::RequestPasswordReset { .. } => "request_password_reset",
            Self::ResendVerification => "resend_verification",
            Self::ReloadAccount => "reload_account",
            Self::SignOut => "sign_out",
        }
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckExistence { email } | Self::RequestPasswordReset { email } => {
                write!(f, "{}({email})", self.name())
            }
            Self::SignIn { email, .. } | Self::Register { email, .. } => write!(f, "{}({email}, ***)", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AuthFlowState,
    pub request: Option<(Ticket, AuthRequest)>,
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Compute the next state. Pure: no I/O, no clock.
#[must_use]
pub fn transition(current: &AuthFlowState, event: AuthEvent) -> Transition {
    let mut state = current.clone();

    if state.exited.is_some() {
        return Transition { state, request: None };
    }
    if state.pending.is_some() && event.is_submission() {
        return Transition { state, request: None };
    }

    let request = match event {
        AuthEvent::Settled { ticket, outcome } => {
            settle(&mut state, ticket, outcome);
            None
        }
        AuthEvent::GoTo(step) => {
            if state.step.links().contains(&step) {
                state.pending = None;
                state.enter(step);
            }
            None
        }
        AuthEvent::UseDifferentEmail => {
            if state.step == AuthStep::VerifyEmail {
                state.reset();
                let ticket = state.issue(RequestKind::SignOut);
                Some((ticket, AuthRequest::SignOut))
            } else {
                None
            }
        }
        event => submit(&mut state, event),
    };

    Transition { state, request }
}

fn submit(state: &mut AuthFlowState, event: AuthEvent) -> Option<(Ticket, AuthRequest)> {
    match (state.step, event) {
        (AuthStep::Email, AuthEvent::SubmitEmail(email)) => {
            let email = email.trim().to_string();
            if email.is_empty() || !email.contains('@') {
                state.fail(MSG_INVALID_EMAIL);
                return None;
            }
            state.email.clone_from(&email);
            state.error = None;
            let ticket = state.issue(RequestKind::CheckExistence);
            Some((ticket, AuthRequest::CheckExistence { email }))
        }
        (AuthStep::Email, AuthEvent::FederatedSignIn) => {
            state.error = None;
            let ticket = state.issue(RequestKind::SignInFederated);
            Some((ticket, AuthRequest::SignInFederated))
        }
        (AuthStep::PasswordLogin, AuthEvent::SubmitPassword(password)) => {
            state.password = Zeroizing::new(password);
            state.error = None;
            Some(sign_in_request(state))
        }
        (AuthStep::RegisterDetails, AuthEvent::SubmitRegistration { name, password }) => {
            state.name = name;
            state.password = Zeroizing::new(password);
            if state.name.trim().is_empty() {
                state.fail(MSG_NAME_REQUIRED);
                return None;
            }
            if state.password.chars().count() < MIN_PASSWORD_CHARS {
                state.fail(MSG_PASSWORD_TOO_SHORT);
                return None;
            }
            state.error = None;
            let ticket = state.issue(RequestKind::Register);
            Some((
                ticket,
                AuthRequest::Register {
                    name: state.name.trim().to_string(),
                    email: state.email.clone(),
                    password: state.password.clone(),
                },
            ))
        }
        (AuthStep::ForgotPassword, AuthEvent::SubmitPasswordReset(email)) => {
            let email = email.trim().to_string();
            if email.is_empty() {
                state.fail(MSG_EMAIL_REQUIRED);
                return None;
            }
            state.email.clone_from(&email);
            state.error = None;
            state.success = None;
            let ticket = state.issue(RequestKind::PasswordReset);
            Some((ticket, AuthRequest::RequestPasswordReset { email }))
        }
        (AuthStep::VerifyEmail, AuthEvent::ConfirmVerified) => {
            state.error = None;
            state.success = None;
            if state.password.is_empty() || state.email.is_empty() {
                let ticket = state.issue(RequestKind::ReloadAccount);
                Some((ticket, AuthRequest::ReloadAccount))
            } else {
                Some(sign_in_request(state))
            }
        }
        (AuthStep::VerifyEmail, AuthEvent::ResendVerification) => {
            state.error = None;
            state.success = None;
            let ticket = state.issue(RequestKind::ResendVerification);
            Some((ticket, AuthRequest::ResendVerification))
        }
        (step, event) => {
            tracing::debug!(%step, ?event, "event not accepted at this step");
            None
        }
    }
}

fn sign_in_request(state: &mut AuthFlowState) -> (Ticket, AuthRequest) {
    let ticket = state.issue(RequestKind::SignIn);
    (
        ticket,
        AuthRequest::SignIn {
            email: state.email.clone(),
            password: state.password.clone(),
        },
    )
}

fn settle(state: &mut AuthFlowState, ticket: Ticket, outcome: AuthOutcome) {
    let Some(pending) = state.pending.filter(|p| p.ticket == ticket) else {
        tracing::debug!(?ticket, "ignoring stale result");
        return;
    };
    state.pending = None;

    match (pending.kind, outcome) {
        (RequestKind::CheckExistence, Ok(AuthReply::Existence(status))) => match status {
            ExistenceStatus::New => state.enter(AuthStep::RegisterDetails),
            ExistenceStatus::Exists => state.enter(AuthStep::PasswordLogin),
            ExistenceStatus::GoogleOnly => state.fail(MSG_GOOGLE_ONLY),
        },
        // Fail open: a lookup outage is treated as an unknown email.
        (RequestKind::CheckExistence, _) => state.enter(AuthStep::RegisterDetails),

        (RequestKind::SignIn | RequestKind::SignInFederated | RequestKind::ReloadAccount, Ok(AuthReply::Account(account))) => {
            if account.email_verified {
                state.exit(account);
            } else if state.step == AuthStep::VerifyEmail {
                state.fail(MSG_NOT_VERIFIED);
            } else {
                state.enter(AuthStep::VerifyEmail);
            }
        }
        (RequestKind::SignIn, Err(AuthErrorKind::InvalidCredential)) => state.fail(MSG_INCORRECT_PASSWORD),
        (RequestKind::SignInFederated, _) => state.fail(MSG_FEDERATED_FAILED),
        (RequestKind::SignIn | RequestKind::ReloadAccount, _) => state.fail(MSG_SIGN_IN_FAILED),

        (RequestKind::Register, Ok(_)) => state.enter(AuthStep::VerifyEmail),
        (RequestKind::Register, Err(AuthErrorKind::EmailInUse)) => state.fail(MSG_EMAIL_IN_USE),
        (RequestKind::Register, Err(_)) => state.fail(MSG_REGISTRATION_FAILED),

        (RequestKind::PasswordReset, Ok(_)) => state.succeed(MSG_RESET_SENT),
        (RequestKind::PasswordReset, Err(_)) => state.fail(MSG_RESET_FAILED),

        (RequestKind::ResendVerification, Ok(_)) => state.succeed(MSG_VERIFICATION_SENT),
        (RequestKind::ResendVerification, Err(_)) => state.fail(MSG_RESEND_FAILED),

        (RequestKind::SignOut, _) => {}
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Runs [`transition`] against an identity provider.
pub struct AuthFlow<P: ?Sized> {
    identity: Arc<P>,
    state: AuthFlowState,
}

impl<P: IdentityProvider + ?Sized> AuthFlow<P> {
    #[must_use]
    pub fn new(identity: Arc<P>, state: AuthFlowState) -> Self {
        Self { identity, state }
    }

    #[must_use]
    pub const fn state(&self) -> &AuthFlowState {
        &self.state
    }

    /// Apply `event`, execute the request it issues (if any), and apply the
    /// outcome.
    pub async fn dispatch(&mut self, event: AuthEvent) -> &AuthFlowState {
        let Transition { state, request } = transition(&self.state, event);
        self.state = state;
        if let Some((ticket, request)) = request {
            tracing::debug!(step = %self.state.step, ?request, "auth request");
            let outcome = self.execute(&request).await;
            self.state = transition(&self.state, AuthEvent::Settled { ticket, outcome }).state;
            tracing::debug!(step = %self.state.step, error = ?self.state.error, "auth settled");
        }
        &self.state
    }

    async fn execute(&self, request: &AuthRequest) -> AuthOutcome {
        let identity = self.identity.as_ref();
        let result = match request {
            AuthRequest::CheckExistence { email } => {
                identity.check_existence(email).await.map(AuthReply::Existence)
            }
            AuthRequest::SignIn { email, password } => identity.sign_in(email, password).await.map(AuthReply::Account),
            AuthRequest::Register { name, email, password } => {
                identity.register(name, email, password).await.map(|()| AuthReply::Done)
            }
            AuthRequest::SignInFederated => identity.sign_in_federated().await.map(AuthReply::Account),
            AuthRequest::RequestPasswordReset { email } => {
                identity.request_password_reset(email).await.map(|()| AuthReply::Done)
            }
            AuthRequest::ResendVerification => identity.resend_verification().await.map(|()| AuthReply::Done),
            AuthRequest::ReloadAccount => identity.reload_account().await.map(AuthReply::Account),
            AuthRequest::SignOut => identity.sign_out().await.map(|()| AuthReply::Done),
        };
        result.map_err(|error| {
            if matches!(request, AuthRequest::CheckExistence { .. }) {
                tracing::warn!(%error, "existence check failed; continuing as a new account");
            } else {
                tracing::warn!(request = request.name(), %error, "identity request failed");
            }
            error.kind()
        })
    }
}
