//! Terminal prompts for the sign-in wizard.
//!
//! Each step offers a fixed menu; the chosen entry is turned into one
//! [`AuthEvent`] after collecting whatever input it needs.

use dialoguer::{Input, Password, Select};
use hub_auth::{AuthEvent, AuthFlowState, AuthStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    EnterEmail,
    Google,
    EnterPassword,
    CreateAccount,
    SendReset,
    ConfirmVerified,
    Resend,
    DifferentEmail,
    Link(AuthStep),
    /// Leave the wizard with the session as it is.
    Later,
}

const EMAIL: &[(&str, Choice)] = &[("Continue with email", Choice::EnterEmail)];
const EMAIL_OR_GOOGLE: &[(&str, Choice)] = &[
    ("Continue with email", Choice::EnterEmail),
    ("Continue with Google", Choice::Google),
];
const PASSWORD_LOGIN: &[(&str, Choice)] = &[
    ("Enter password", Choice::EnterPassword),
    ("Forgot password?", Choice::Link(AuthStep::ForgotPassword)),
    ("Use a different email", Choice::Link(AuthStep::Email)),
];
const REGISTER_DETAILS: &[(&str, Choice)] = &[
    ("Create account", Choice::CreateAccount),
    ("Use a different email", Choice::Link(AuthStep::Email)),
];
const FORGOT_PASSWORD: &[(&str, Choice)] = &[
    ("Send reset link", Choice::SendReset),
    ("Back to sign in", Choice::Link(AuthStep::PasswordLogin)),
];
const VERIFY_EMAIL: &[(&str, Choice)] = &[
    ("I've verified my email", Choice::ConfirmVerified),
    ("Resend verification email", Choice::Resend),
    ("Use a different email", Choice::DifferentEmail),
    ("Finish later", Choice::Later),
];

/// Menu for `step`. Google is offered on the email step only when the
/// federated sign-in page is configured.
pub fn menu(step: AuthStep, federated: bool) -> &'static [(&'static str, Choice)] {
    match step {
        AuthStep::Email if federated => EMAIL_OR_GOOGLE,
        AuthStep::Email => EMAIL,
        AuthStep::PasswordLogin => PASSWORD_LOGIN,
        AuthStep::RegisterDetails => REGISTER_DETAILS,
        AuthStep::ForgotPassword => FORGOT_PASSWORD,
        AuthStep::VerifyEmail => VERIFY_EMAIL,
    }
}

fn heading(state: &AuthFlowState) -> String {
    match state.step() {
        AuthStep::Email => "Sign in or create an account".to_string(),
        AuthStep::PasswordLogin => format!("Welcome back, {}", state.email()),
        AuthStep::RegisterDetails => format!("Create an account for {}", state.email()),
        AuthStep::ForgotPassword => "Reset your password".to_string(),
        AuthStep::VerifyEmail => format!("We sent a verification link to {}", state.email()),
    }
}

/// Ask for the next event. `None` means the visitor chose to stop.
pub fn prompt(state: &AuthFlowState, federated: bool) -> anyhow::Result<Option<AuthEvent>> {
    let items = menu(state.step(), federated);
    let choice = if items.len() == 1 {
        items[0].1
    } else {
        let labels: Vec<&str> = items.iter().map(|(label, _)| *label).collect();
        let index = Select::new()
            .with_prompt(heading(state))
            .items(&labels)
            .default(0)
            .interact()?;
        items[index].1
    };
    collect(choice, state)
}

fn collect(choice: Choice, state: &AuthFlowState) -> anyhow::Result<Option<AuthEvent>> {
    let event = match choice {
        Choice::EnterEmail => AuthEvent::SubmitEmail(Input::new().with_prompt("Email").interact_text()?),
        Choice::Google => AuthEvent::FederatedSignIn,
        Choice::EnterPassword => {
            AuthEvent::SubmitPassword(Password::new().with_prompt("Password").interact()?)
        }
        Choice::CreateAccount => {
            let name: String = Input::new()
                .with_prompt("Full name")
                .with_initial_text(state.name())
                .interact_text()?;
            let password = Password::new()
                .with_prompt("Choose a password")
                .with_confirmation("Confirm password", "Passwords don't match")
                .interact()?;
            AuthEvent::SubmitRegistration { name, password }
        }
        Choice::SendReset => AuthEvent::SubmitPasswordReset(
            Input::new()
                .with_prompt("Email")
                .with_initial_text(state.email())
                .interact_text()?,
        ),
        Choice::ConfirmVerified => AuthEvent::ConfirmVerified,
        Choice::Resend => AuthEvent::ResendVerification,
        Choice::DifferentEmail => AuthEvent::UseDifferentEmail,
        Choice::Link(step) => AuthEvent::GoTo(step),
        Choice::Later => return Ok(None),
    };
    Ok(Some(event))
}
