//! Identity provider configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://securetoken.googleapis.com/v1/token".to_string()
}

/// Default wait for the federated sign-in browser callback, in seconds.
const fn default_callback_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// Web API key of the identity project.
    #[serde(default)]
    pub api_key: String,

    /// Identity Toolkit REST base URL (point at an emulator for local work).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Secure-token endpoint used to exchange a stored refresh token.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Hosted page that runs the Google sign-in and redirects back to the
    /// local callback with an `id_token` parameter.
    #[serde(default)]
    pub federated_sign_in_url: String,

    /// How long to wait for the federated sign-in callback.
    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            token_url: default_token_url(),
            federated_sign_in_url: String::new(),
            callback_timeout_secs: default_callback_timeout_secs(),
        }
    }
}

impl IdentityConfig {
    /// Check if the identity config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }

    /// Whether the Google sign-in path can be offered.
    pub fn supports_federated(&self) -> bool {
        self.is_configured() && !self.federated_sign_in_url.is_empty()
    }
}
