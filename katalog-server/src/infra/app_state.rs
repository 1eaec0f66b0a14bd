use std::{fmt, sync::Arc};

use katalog_core::{
    AuditLog, AuthGate, CatalogError, CatalogService, ImageResolver,
    ItemRepository, KeyValueStore, LayoutError,
};

use crate::infra::{cache::ResponseCache, config::Config, errors::AppError};

/// Everything a handler needs: one store client and the services built on
/// it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn KeyValueStore>,
    pub catalog: Arc<CatalogService>,
    pub images: Arc<ImageResolver>,
    pub auth: Arc<AuthGate>,
    pub audit: Arc<AuditLog>,
    pub cache: Arc<ResponseCache>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_tag())
            .field("dev_mode", &self.config.dev_mode)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, LayoutError> {
        let layout = config.store.layout()?;
        let repository = ItemRepository::new(store.clone(), layout);

        let audit = if config.audit.enabled {
            AuditLog::new(store.clone(), config.audit.prefix.clone())
        } else {
            AuditLog::disabled(store.clone(), config.audit.prefix.clone())
        };

        Ok(Self {
            catalog: Arc::new(CatalogService::new(repository.clone())),
            images: Arc::new(ImageResolver::new(repository)),
            auth: Arc::new(AuthGate::new(store.clone(), config.auth.credentials())),
            audit: Arc::new(audit),
            cache: Arc::new(ResponseCache::with_capacity(
                config.cache.enabled,
                config.cache.max_entries,
            )),
            config: Arc::new(config),
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Map a core error, exposing store details only in dev mode.
    pub fn app_error(&self, err: CatalogError) -> AppError {
        match err {
            CatalogError::Store(err) => AppError::store(&err, self.config.dev_mode),
            other => AppError::from(other),
        }
    }
}
