use thiserror::Error;

use super::models::{Config, StoreBackend, default_partitions};
use katalog_core::catalog::DEFAULT_THRESHOLD_RATIO;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("{field} must not be empty")]
    MissingCredential { field: &'static str },
    #[error("store value cap must be greater than zero")]
    ZeroValueCap,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

/// Rejects unusable settings and repairs recoverable ones, reporting each
/// repair as a warning.
pub fn apply_guard_rails(
    config: &mut Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.auth.admin_username.trim().is_empty() {
        return Err(ConfigGuardRailError::MissingCredential {
            field: "ADMIN_USERNAME",
        });
    }
    if config.auth.admin_password.is_empty() {
        return Err(ConfigGuardRailError::MissingCredential {
            field: "ADMIN_PASSWORD",
        });
    }
    if config.store.value_cap_bytes == 0 {
        return Err(ConfigGuardRailError::ZeroValueCap);
    }

    if config.auth.credentials().uses_default_password() {
        warnings.push_with_hint(
            "ADMIN_PASSWORD uses the built-in default",
            "Set ADMIN_PASSWORD (or auth.admin_password) before exposing the server",
        );
    }
    warnings.push_with_hint(
        "Admin credentials are compared as plaintext",
        "Keep the config file and environment readable only by the service user",
    );

    if !config.auth.cookie_secure && !config.dev_mode {
        warnings.push_with_hint(
            "COOKIE_SECURE is false outside dev mode",
            "Browsers will send the admin cookie over plain HTTP",
        );
    }

    if config.store.backend == StoreBackend::Redis
        && config
            .store
            .redis_url
            .as_deref()
            .is_none_or(|url| url.trim().is_empty())
    {
        config.store.backend = StoreBackend::Memory;
        warnings.push_with_hint(
            "Redis backend selected but REDIS_URL is not set; using the in-memory store",
            "Set REDIS_URL or store.redis_url; in-memory data is lost on restart",
        );
    }

    let ratio = config.store.threshold_ratio;
    if !(ratio > 0.0 && ratio <= 1.0) {
        config.store.threshold_ratio = DEFAULT_THRESHOLD_RATIO;
        warnings.push_with_hint(
            format!(
                "Threshold ratio {ratio} is outside (0, 1]; using {DEFAULT_THRESHOLD_RATIO}"
            ),
            "Set STORE_THRESHOLD_RATIO to a fraction such as 0.7",
        );
    }

    if let Err(err) = config.store.layout() {
        config.store.partitions = default_partitions();
        warnings.push_with_hint(
            format!("Invalid partition layout ({err}); using the default layout"),
            "Partitions need unique, non-empty names and keys",
        );
    }

    if config.cors.is_wildcard_included() && !config.dev_mode {
        warnings.push(
            "CORS allows any origin outside dev mode; list explicit origins instead",
        );
    }

    Ok(warnings)
}
