//! Best-effort audit trail kept in the key-value store.
//!
//! Each entry lives under its own key, `<prefix><unix-millis>:<6 base36>`,
//! so listing by prefix and sorting keys yields chronological order.

use std::{any::type_name_of_val, fmt, sync::Arc};

use chrono::{SecondsFormat, Utc};
use katalog_model::{AuditEntry, AuditLevel};
use rand::Rng;
use tracing::{error, warn};

use crate::error::{Result, StoreError};
use crate::store::KeyValueStore;

pub const DEFAULT_AUDIT_PREFIX: &str = "log:";
/// Upper bound on entries returned by one [`AuditLog::recent`] call.
pub const MAX_RECENT: usize = 100;

const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
    enabled: bool,
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog")
            .field("store", &type_name_of_val(self.store.as_ref()))
            .field("prefix", &self.prefix)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl AuditLog {
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            enabled: true,
        }
    }

    /// A log that drops every record; reads still work.
    pub fn disabled(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(store, prefix)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Persist one entry. Failures are logged and otherwise ignored.
    pub async fn record(&self, level: AuditLevel, message: impl Into<String>) {
        if !self.enabled {
            return;
        }
        let now = Utc::now();
        let entry = AuditEntry {
            waktu: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            level,
            isi: message.into(),
        };
        let key = format!("{}{}:{}", self.prefix, now.timestamp_millis(), random_suffix());

        let result = match serde_json::to_string(&entry) {
            Ok(encoded) => self.store.put(&key, encoded).await,
            Err(err) => Err(StoreError::from(err)),
        };
        if let Err(err) = result {
            error!(key = %key, error = %err, "Failed to write audit entry");
        }
    }

    /// Newest entries first, at most `min(limit, MAX_RECENT)` of them.
    /// Entries that vanish or fail to parse between listing and reading are
    /// skipped.
    pub async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let mut keys = self.store.list(&self.prefix).await?;
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.truncate(limit.min(MAX_RECENT));

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(raw) = self.store.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<AuditEntry>(&raw) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(key = %key, error = %err, "Skipping unreadable audit entry"),
            }
        }
        Ok(entries)
    }

    /// Delete every entry, returning how many keys were removed.
    pub async fn clear(&self) -> Result<usize> {
        let keys = self.store.list(&self.prefix).await?;
        for key in &keys {
            self.store.delete(key).await?;
        }
        Ok(keys.len())
    }
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
