//! Layered configuration: `.env`, environment variables, optional TOML
//! file, then built-in defaults.

pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    AuditConfig, AuthConfig, CacheConfig, Config, ConfigMetadata, CorsConfig,
    PartitionConfig, ServerConfig, StoreBackend, StoreConfig, TimeoutConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
