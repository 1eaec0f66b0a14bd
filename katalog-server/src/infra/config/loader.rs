use once_cell::sync::Lazy;
use std::{fs, path::PathBuf};
use thiserror::Error;

use super::{
    models::{
        AuditConfig, AuthConfig, CacheConfig, Config, ConfigMetadata,
        CorsConfig, ServerConfig, StoreConfig, TimeoutConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("katalog.toml"),
        PathBuf::from("config/katalog.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let metadata = ConfigMetadata {
            config_path,
            env_file_loaded,
        };
        compose_config(file_config, env_config, metadata)
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = match (&self.options.config_path, &env_config.config_path)
        {
            (Some(path), _) | (None, Some(path)) => (Some(path.clone()), true),
            (None, None) => (
                DEFAULT_CONFIG_LOCATIONS
                    .iter()
                    .find(|candidate| candidate.exists())
                    .cloned(),
                false,
            ),
        };

        let Some(path) = path else {
            return Ok((None, None));
        };
        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents = fs::read_to_string(&path).map_err(|err| {
            ConfigLoadError::Io {
                path: path.clone(),
                source: err,
            }
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
                path: path.clone(),
                source: err,
            })?;

        Ok((Some(file_config), Some(path)))
    }
}

/// Merge sources with precedence environment > file > defaults, then run
/// the guard rails.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<ConfigLoad, ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if metadata.config_path.is_none() {
        warnings.push_with_hint(
            "No katalog.toml detected; using environment variables and defaults",
            "Create katalog.toml or point KATALOG_CONFIG_PATH at one",
        );
    }

    let FileConfig {
        server: file_server,
        store: file_store,
        auth: file_auth,
        cache: file_cache,
        timeouts: file_timeouts,
        audit: file_audit,
        cors: file_cors,
        dev_mode: file_dev_mode,
    } = file_config.unwrap_or_default();

    let server_defaults = ServerConfig::default();
    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or(server_defaults.host),
        port: env.server_port.or(file_server.port).unwrap_or(server_defaults.port),
        static_dir: env.static_dir.or(file_server.static_dir),
    };

    let store_defaults = StoreConfig::default();
    let store = StoreConfig {
        backend: env
            .store_backend
            .or(file_store.backend)
            .unwrap_or(store_defaults.backend),
        redis_url: env
            .redis_url
            .or(file_store.redis_url)
            .filter(|url| !url.trim().is_empty()),
        redis_namespace: env
            .redis_namespace
            .or(file_store.redis_namespace)
            .filter(|ns| !ns.trim().is_empty()),
        value_cap_bytes: env
            .value_cap_bytes
            .or(file_store.value_cap_bytes)
            .unwrap_or(store_defaults.value_cap_bytes),
        threshold_ratio: env
            .threshold_ratio
            .or(file_store.threshold_ratio)
            .unwrap_or(store_defaults.threshold_ratio),
        partitions: env
            .partitions
            .or(file_store.partitions)
            .unwrap_or(store_defaults.partitions),
    };

    let auth_defaults = AuthConfig::default();
    let auth = AuthConfig {
        admin_username: env
            .admin_username
            .or(file_auth.admin_username)
            .unwrap_or(auth_defaults.admin_username),
        admin_password: env
            .admin_password
            .or(file_auth.admin_password)
            .unwrap_or(auth_defaults.admin_password),
        cookie_secure: env
            .cookie_secure
            .or(file_auth.cookie_secure)
            .unwrap_or(auth_defaults.cookie_secure),
    };

    let cache_defaults = CacheConfig::default();
    let cache = CacheConfig {
        enabled: env
            .cache_enabled
            .or(file_cache.enabled)
            .unwrap_or(cache_defaults.enabled),
        list_ttl_secs: env
            .cache_list_ttl_secs
            .or(file_cache.list_ttl_secs)
            .unwrap_or(cache_defaults.list_ttl_secs),
        image_ttl_secs: env
            .cache_image_ttl_secs
            .or(file_cache.image_ttl_secs)
            .unwrap_or(cache_defaults.image_ttl_secs),
        max_entries: env
            .cache_max_entries
            .or(file_cache.max_entries)
            .unwrap_or(cache_defaults.max_entries),
    };

    let timeout_defaults = TimeoutConfig::default();
    let timeouts = TimeoutConfig {
        list_ms: env
            .list_timeout_ms
            .or(file_timeouts.list_ms)
            .unwrap_or(timeout_defaults.list_ms),
        image_ms: env
            .image_timeout_ms
            .or(file_timeouts.image_ms)
            .unwrap_or(timeout_defaults.image_ms),
    };

    let audit_defaults = AuditConfig::default();
    let audit = AuditConfig {
        enabled: env
            .audit_enabled
            .or(file_audit.enabled)
            .unwrap_or(audit_defaults.enabled),
        prefix: env
            .audit_prefix
            .or(file_audit.prefix)
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(audit_defaults.prefix),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or_default(),
    };

    let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

    let mut config = Config {
        server,
        store,
        auth,
        cache,
        timeouts,
        audit,
        cors,
        dev_mode,
        metadata,
    };

    let guard_warnings = validation::apply_guard_rails(&mut config)?;
    warnings.extend(guard_warnings);

    Ok(ConfigLoad { config, warnings })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::infra::config::models::StoreBackend;

    #[test]
    fn env_overrides_file_overrides_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [auth]
            admin_username = "pemilik"
            admin_password = "dari-file"

            [cache]
            list_ttl_secs = 5
            "#,
        )
        .unwrap();
        let env = EnvConfig {
            server_port: Some(9100),
            admin_password: Some("dari-env".into()),
            ..EnvConfig::default()
        };
        let metadata = ConfigMetadata {
            config_path: Some(PathBuf::from("katalog.toml")),
            env_file_loaded: false,
        };

        let ConfigLoad { config, warnings } =
            compose_config(Some(file), env, metadata).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.auth.admin_username, "pemilik");
        assert_eq!(config.auth.admin_password, "dari-env");
        assert_eq!(config.cache.list_ttl_secs, 5);
        assert_eq!(config.cache.image_ttl_secs, 86_400);
        assert_eq!(config.timeouts.list_ms, 3_000);
        assert_eq!(config.store.threshold_bytes(), 17_500_000);
        assert!(
            !warnings
                .items
                .iter()
                .any(|w| w.message.contains("No katalog.toml"))
        );
    }

    #[test]
    fn missing_file_is_reported_as_warning() {
        let ConfigLoad { config, warnings } = compose_config(
            None,
            EnvConfig::default(),
            ConfigMetadata::default(),
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(warnings.items.iter().any(|w| w.message.contains("No katalog.toml")));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new()
            .with_env_file(dir.path().join("absent.env"))
            .with_config_path(dir.path().join("absent.toml"));
        assert!(matches!(
            loader.load(),
            Err(ConfigLoadError::MissingConfig { .. })
        ));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("katalog.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let loader = ConfigLoader::new()
            .with_env_file(dir.path().join("absent.env"))
            .with_config_path(&path);
        assert!(matches!(loader.load(), Err(ConfigLoadError::Parse { .. })));
    }
}
