//! Single-admin session gate.
//!
//! One credential pair is configured; a successful login stores a fresh
//! token under [`ADMIN_TOKEN_KEY`], replacing whatever was there, so at
//! most one session is valid at any time. Tokens do not expire.
//!
//! The configured password is held and compared as plaintext.

use std::{any::type_name_of_val, fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use constant_time_eq::constant_time_eq;
use rand::{TryRngCore, rngs::OsRng};
use tracing::{info, warn};

use crate::error::{CatalogError, Result};
use crate::store::KeyValueStore;

pub const ADMIN_TOKEN_KEY: &str = "admin_token";

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_ADMIN_PASSWORD
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        // Both comparisons always run.
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct AuthGate {
    store: Arc<dyn KeyValueStore>,
    credentials: AdminCredentials,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("store", &type_name_of_val(self.store.as_ref()))
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl AuthGate {
    pub fn new(store: Arc<dyn KeyValueStore>, credentials: AdminCredentials) -> Self {
        Self { store, credentials }
    }

    /// Issue a new session token, invalidating any previous one.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        if !self.credentials.matches(username, password) {
            warn!(username, "Rejected admin login");
            return Err(CatalogError::Unauthorized);
        }

        let token = generate_token()?;
        self.store.put(ADMIN_TOKEN_KEY, token.clone()).await?;
        info!(username, "Admin logged in");
        Ok(token)
    }

    /// Whether `token` is the currently stored session token.
    pub async fn verify(&self, token: &str) -> Result<bool> {
        if token.is_empty() {
            return Ok(false);
        }
        let stored = self.store.get(ADMIN_TOKEN_KEY).await?;
        Ok(stored.is_some_and(|stored| {
            !stored.is_empty() && constant_time_eq(stored.as_bytes(), token.as_bytes())
        }))
    }
}

/// 256 bits of OS randomness, URL-safe base64 without padding.
fn generate_token() -> Result<String> {
    let mut token_bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut token_bytes)
        .map_err(|_| CatalogError::TokenGeneration)?;
    Ok(URL_SAFE_NO_PAD.encode(token_bytes))
}
