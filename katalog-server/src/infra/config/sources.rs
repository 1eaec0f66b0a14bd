use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::models::{PartitionConfig, StoreBackend};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub store: FileStoreConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub cache: FileCacheConfig,
    #[serde(default)]
    pub timeouts: FileTimeoutConfig,
    #[serde(default)]
    pub audit: FileAuditConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<StoreBackend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_cap_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partitions: Option<Vec<PartitionConfig>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_secure: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_ttl_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ttl_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileTimeoutConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ms: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuditConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub store_backend: Option<StoreBackend>,
    pub redis_url: Option<String>,
    pub redis_namespace: Option<String>,
    pub value_cap_bytes: Option<usize>,
    pub threshold_ratio: Option<f64>,
    pub partitions: Option<Vec<PartitionConfig>>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub cookie_secure: Option<bool>,
    pub cache_enabled: Option<bool>,
    pub cache_list_ttl_secs: Option<u64>,
    pub cache_image_ttl_secs: Option<u64>,
    pub cache_max_entries: Option<usize>,
    pub list_timeout_ms: Option<u64>,
    pub image_timeout_ms: Option<u64>,
    pub audit_enabled: Option<bool>,
    pub audit_prefix: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        let mut env_config = Self::default();

        env_config.config_path =
            std::env::var("KATALOG_CONFIG_PATH").ok().map(PathBuf::from);

        env_config.server_host = std::env::var("SERVER_HOST").ok();
        env_config.server_port = parse_var("SERVER_PORT");
        env_config.static_dir =
            std::env::var("STATIC_DIR").ok().map(PathBuf::from);

        env_config.store_backend = std::env::var("KATALOG_STORE")
            .ok()
            .and_then(|raw| StoreBackend::parse(&raw));
        env_config.redis_url = std::env::var("REDIS_URL").ok();
        env_config.redis_namespace = std::env::var("REDIS_NAMESPACE").ok();
        env_config.value_cap_bytes = parse_var("STORE_VALUE_CAP_BYTES");
        env_config.threshold_ratio = parse_var("STORE_THRESHOLD_RATIO");
        env_config.partitions = std::env::var("KATALOG_PARTITIONS")
            .ok()
            .map(|raw| parse_partitions(&raw));

        env_config.admin_username = std::env::var("ADMIN_USERNAME").ok();
        env_config.admin_password = std::env::var("ADMIN_PASSWORD").ok();
        env_config.cookie_secure = parse_bool_var("COOKIE_SECURE");

        env_config.cache_enabled = parse_bool_var("CACHE_ENABLED");
        env_config.cache_list_ttl_secs = parse_var("CACHE_LIST_TTL_SECS");
        env_config.cache_image_ttl_secs = parse_var("CACHE_IMAGE_TTL_SECS");
        env_config.cache_max_entries = parse_var("CACHE_MAX_ENTRIES");

        env_config.list_timeout_ms = parse_var("LIST_TIMEOUT_MS");
        env_config.image_timeout_ms = parse_var("IMAGE_TIMEOUT_MS");

        env_config.audit_enabled = parse_bool_var("AUDIT_ENABLED");
        env_config.audit_prefix = std::env::var("AUDIT_PREFIX").ok();

        env_config.cors_allowed_origins = parse_csv_var("CORS_ALLOWED_ORIGINS");
        env_config.dev_mode = parse_bool_var("DEV_MODE");

        env_config
    }
}

/// `name=key` pairs separated by commas; a bare entry uses the same
/// string for both.
pub fn parse_partitions(raw: &str) -> Vec<PartitionConfig> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((name, key)) => PartitionConfig {
                name: name.trim().to_string(),
                key: key.trim().to_string(),
            },
            None => PartitionConfig {
                name: part.to_string(),
                key: part.to_string(),
            },
        })
        .collect()
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_csv_var(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| {
        raw.split(',')
            .filter_map(|part| {
                let trimmed = part.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect()
    })
}

fn parse_bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|raw| {
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_parse_pairs_and_bare_names() {
        let parsed = parse_partitions("primary=items, overflow=items_overflow,extra");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[1].name, "overflow");
        assert_eq!(parsed[1].key, "items_overflow");
        assert_eq!(parsed[2].name, "extra");
        assert_eq!(parsed[2].key, "extra");
    }

    #[test]
    fn file_config_reads_sections() {
        let file: FileConfig = toml::from_str(
            r#"
            dev_mode = true

            [server]
            port = 9000

            [store]
            backend = "redis"
            redis_url = "redis://127.0.0.1/"
            partitions = [
                { name = "a", key = "items_a" },
                { name = "b", key = "items_b" },
            ]

            [timeouts]
            image_ms = 750
            "#,
        )
        .unwrap();

        assert_eq!(file.server.port, Some(9000));
        assert_eq!(file.store.backend, Some(StoreBackend::Redis));
        assert_eq!(file.store.partitions.as_ref().map(Vec::len), Some(2));
        assert_eq!(file.timeouts.image_ms, Some(750));
        assert_eq!(file.timeouts.list_ms, None);
        assert_eq!(file.dev_mode, Some(true));
    }
}
