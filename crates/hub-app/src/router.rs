//! View router.
//!
//! Maps the requested [`View`] and the current account to the screen that is
//! actually shown. The console is guarded: visitors without a verified
//! developer account are redirected.

use std::fmt;

use hub_auth::AuthStep;
use hub_core::account::Account;
use serde::Serialize;

/// What the visitor asked to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "id", rename_all = "kebab-case")]
pub enum View {
    Home,
    Auth,
    Console,
    AppDetails(String),
    About,
}

/// What is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "detail", rename_all = "kebab-case")]
pub enum Screen {
    Home,
    Auth(AuthStep),
    Console,
    /// Verified account without the developer role asked for the console.
    DeveloperUpgrade,
    AppDetails(String),
    About,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Auth(step) => write!(f, "auth ({step})"),
            Self::Console => f.write_str("console"),
            Self::DeveloperUpgrade => f.write_str("developer upgrade"),
            Self::AppDetails(id) => write!(f, "app details ({id})"),
            Self::About => f.write_str("about"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub screen: Screen,
    pub show_nav: bool,
}

/// Resolve `view` for the current `account`.
#[must_use]
pub fn route(view: &View, account: Option<&Account>) -> Route {
    let screen = match view {
        View::Home => Screen::Home,
        View::About => Screen::About,
        View::AppDetails(id) => Screen::AppDetails(id.clone()),
        View::Auth => match account {
            Some(acc) if !acc.email_verified => Screen::Auth(AuthStep::VerifyEmail),
            _ => Screen::Auth(AuthStep::Email),
        },
        View::Console => match account {
            None => Screen::Auth(AuthStep::Email),
            Some(acc) if !acc.email_verified => Screen::Auth(AuthStep::VerifyEmail),
            Some(acc) if !acc.can_use_console() => Screen::DeveloperUpgrade,
            Some(_) => Screen::Console,
        },
    };
    let show_nav = !matches!(screen, Screen::Auth(_) | Screen::AppDetails(_));
    tracing::debug!(?view, %screen, show_nav, "routed");
    Route { screen, show_nav }
}
