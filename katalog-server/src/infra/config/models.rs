use std::{net::SocketAddr, path::PathBuf, time::Duration};

use katalog_core::{
    LayoutError, Partition, PartitionLayout,
    audit::DEFAULT_AUDIT_PREFIX,
    auth::{AdminCredentials, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME},
    catalog::{
        DEFAULT_THRESHOLD_RATIO, OVERFLOW_KEY, OVERFLOW_PARTITION, PRIMARY_KEY,
        PRIMARY_PARTITION, threshold_for_cap,
    },
    store::DEFAULT_VALUE_CAP_BYTES,
};
use serde::{Deserialize, Serialize};

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub timeouts: TimeoutConfig,
    pub audit: AuditConfig,
    pub cors: CorsConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Pre-built client assets served for every non-API path.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8787,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

impl StoreBackend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    pub name: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub redis_url: Option<String>,
    /// Prefix for every Redis key, letting catalogs share a database.
    pub redis_namespace: Option<String>,
    pub value_cap_bytes: usize,
    pub threshold_ratio: f64,
    pub partitions: Vec<PartitionConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            redis_url: None,
            redis_namespace: None,
            value_cap_bytes: DEFAULT_VALUE_CAP_BYTES,
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
            partitions: default_partitions(),
        }
    }
}

impl StoreConfig {
    pub fn threshold_bytes(&self) -> usize {
        threshold_for_cap(self.value_cap_bytes, self.threshold_ratio)
    }

    pub fn layout(&self) -> Result<PartitionLayout, LayoutError> {
        let partitions = self
            .partitions
            .iter()
            .map(|p| Partition::new(p.name.clone(), p.key.clone()))
            .collect();
        PartitionLayout::new(partitions, self.threshold_bytes())
    }
}

pub fn default_partitions() -> Vec<PartitionConfig> {
    vec![
        PartitionConfig {
            name: PRIMARY_PARTITION.into(),
            key: PRIMARY_KEY.into(),
        },
        PartitionConfig {
            name: OVERFLOW_PARTITION.into(),
            key: OVERFLOW_KEY.into(),
        },
    ]
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub admin_username: String,
    pub admin_password: String,
    /// Adds `Secure` to the session cookie. Only disable for plain-HTTP
    /// local development.
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: DEFAULT_ADMIN_USERNAME.into(),
            admin_password: DEFAULT_ADMIN_PASSWORD.into(),
            cookie_secure: true,
        }
    }
}

impl AuthConfig {
    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials::new(self.admin_username.clone(), self.admin_password.clone())
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub enabled: bool,
    pub list_ttl_secs: u64,
    pub image_ttl_secs: u64,
    /// Upper bound on cached responses across lists and images.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            list_ttl_secs: 60,
            image_ttl_secs: 86_400,
            max_entries: 1024,
        }
    }
}

impl CacheConfig {
    pub fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.list_ttl_secs)
    }

    pub fn image_ttl(&self) -> Duration {
        Duration::from_secs(self.image_ttl_secs)
    }
}

#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub list_ms: u64,
    pub image_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            list_ms: 3_000,
            image_ms: 5_000,
        }
    }
}

impl TimeoutConfig {
    pub fn list(&self) -> Duration {
        Duration::from_millis(self.list_ms)
    }

    pub fn image(&self) -> Duration {
        Duration::from_millis(self.image_ms)
    }
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub enabled: bool,
    pub prefix: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: DEFAULT_AUDIT_PREFIX.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
