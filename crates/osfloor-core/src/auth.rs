//! Bearer tokens for the management API.
//!
//! Acquiring a token is someone else's job; this module only hands an
//! already-issued token to the HTTP client.

use crate::error::AuthError;

/// Keyring entry holding the management API token.
pub const TOKEN_KEY: &str = "graph_token";

/// Source of the bearer token sent to the management API.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Result<String, AuthError>;
}

/// A token supplied directly (flag, environment, tests).
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl TokenSource for StaticToken {
    fn access_token(&self) -> Result<String, AuthError> {
        if self.0.trim().is_empty() {
            return Err(AuthError::NotAuthenticated);
        }
        Ok(self.0.clone())
    }
}

/// A token read from the OS keyring on every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringToken;

impl KeyringToken {
    /// Store `token`, replacing any previous value.
    pub fn store(token: &str) -> Result<(), AuthError> {
        keyring_store::set(TOKEN_KEY, token)
    }

    /// Remove the stored token. Succeeds if none was stored.
    pub fn clear() -> Result<(), AuthError> {
        keyring_store::delete(TOKEN_KEY)
    }

    pub fn is_stored() -> bool {
        matches!(keyring_store::get(TOKEN_KEY), Ok(Some(_)))
    }
}

impl TokenSource for KeyringToken {
    fn access_token(&self) -> Result<String, AuthError> {
        keyring_store::get(TOKEN_KEY)?.ok_or(AuthError::NotAuthenticated)
    }
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::AuthError;

    const SERVICE: &str = "osfloor";

    pub fn get(key: &str) -> Result<Option<String>, AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), AuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
