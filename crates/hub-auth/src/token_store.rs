//! Refresh-token persistence.
//!
//! The refresh token outlives a single `hub` invocation so the session can be
//! restored on the next start. Priority on load: OS keychain, then the
//! `HUB_AUTH_TOKEN` environment variable, then `~/.hub/credentials`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "afrotech-hub";
const KEYRING_USER: &str = "refresh-token";
const CREDENTIALS_DIR: &str = ".hub";
const CREDENTIALS_FILE_NAME: &str = "credentials";
const TOKEN_ENV: &str = "HUB_AUTH_TOKEN";

/// Keyring service name. `HUB_KEYRING_SERVICE` overrides it so test runs
/// never touch real credentials.
fn keyring_service() -> String {
    std::env::var("HUB_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Store a refresh token in the OS keychain, falling back to the credentials
/// file.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if both keychain and file fail.
pub fn store(token: &str) -> Result<(), AuthError> {
    match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        Ok(entry) => match entry.set_password(token) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                store_file(&credentials_path()?, token)
            }
        },
        Err(error) => {
            tracing::warn!(%error, "keyring unavailable; falling back to file");
            store_file(&credentials_path()?, token)
        }
    }
}

#[must_use]
pub fn load() -> Option<String> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && let Ok(token) = entry.get_password()
        && !token.is_empty()
    {
        return Some(token);
    }

    if let Ok(token) = std::env::var(TOKEN_ENV)
        && !token.is_empty()
    {
        return Some(token);
    }

    credentials_path().ok().and_then(|path| load_file(&path))
}

/// Delete stored credentials from keychain and file.
///
/// # Errors
///
/// Returns `AuthError::TokenStoreError` if the credentials file cannot be removed.
pub fn delete() -> Result<(), AuthError> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        let _ = entry.delete_credential();
    }
    delete_file(&credentials_path()?)
}

/// Which tier the stored token came from, for `hub auth status`.
#[must_use]
pub fn detect_token_source() -> Option<&'static str> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && entry.get_password().is_ok_and(|t| !t.is_empty())
    {
        return Some("keyring");
    }
    if std::env::var(TOKEN_ENV).is_ok_and(|t| !t.is_empty()) {
        return Some("env");
    }
    if credentials_path().ok().and_then(|path| load_file(&path)).is_some() {
        return Some("file");
    }
    None
}

fn credentials_path() -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|h| h.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE_NAME))
        .ok_or_else(|| {
            AuthError::TokenStoreError("home directory not found; cannot store credentials".into())
        })
}

fn store_file(path: &Path, token: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::TokenStoreError(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, token)
        .map_err(|e| AuthError::TokenStoreError(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::TokenStoreError(format!("chmod {}: {e}", path.display())))?;
    }
    Ok(())
}

fn load_file(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn delete_file(path: &Path) -> Result<(), AuthError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| {
            AuthError::TokenStoreError(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_path_is_under_home() {
        let path = credentials_path().expect("should resolve");
        assert!(path.ends_with(".hub/credentials"));
    }

    #[test]
    fn file_store_load_delete_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join(CREDENTIALS_DIR).join(CREDENTIALS_FILE_NAME);

        store_file(&path, "refresh-abc123").expect("store");
        assert_eq!(load_file(&path).as_deref(), Some("refresh-abc123"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
            assert_eq!(mode, 0o600, "credentials file should be 0600");
            let dir_mode = fs::metadata(path.parent().unwrap())
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777;
            assert_eq!(dir_mode, 0o700);
        }

        delete_file(&path).expect("delete");
        assert!(!path.exists());
        delete_file(&path).expect("deleting twice is fine");
    }

    #[test]
    fn load_file_ignores_blank_content() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join(CREDENTIALS_FILE_NAME);
        fs::write(&path, "   \n  ").expect("write");
        assert!(load_file(&path).is_none());
    }
}
