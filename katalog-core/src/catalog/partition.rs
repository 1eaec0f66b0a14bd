use std::collections::HashSet;

use thiserror::Error;

use crate::store::DEFAULT_VALUE_CAP_BYTES;

pub const PRIMARY_PARTITION: &str = "primary";
pub const PRIMARY_KEY: &str = "items";
pub const OVERFLOW_PARTITION: &str = "overflow";
pub const OVERFLOW_KEY: &str = "items_overflow";

/// Fraction of the value cap a partition may fill before writes move on.
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.70;

/// A named bucket of items stored as one JSON array under `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    name: String,
    key: String,
}

impl Partition {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("at least one partition is required")]
    Empty,
    #[error("partition name '{0}' is used more than once")]
    DuplicateName(String),
    #[error("store key '{0}' is used by more than one partition")]
    DuplicateKey(String),
    #[error("partition name and key must be non-empty")]
    BlankField,
    #[error("threshold must be greater than zero")]
    ZeroThreshold,
}

/// Ordered partitions plus the byte threshold that decides when a write
/// skips to the next one. The last partition is the unconditional fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionLayout {
    partitions: Vec<Partition>,
    threshold_bytes: usize,
}

impl Default for PartitionLayout {
    fn default() -> Self {
        Self {
            partitions: vec![
                Partition::new(PRIMARY_PARTITION, PRIMARY_KEY),
                Partition::new(OVERFLOW_PARTITION, OVERFLOW_KEY),
            ],
            threshold_bytes: threshold_for_cap(
                DEFAULT_VALUE_CAP_BYTES,
                DEFAULT_THRESHOLD_RATIO,
            ),
        }
    }
}

impl PartitionLayout {
    pub fn new(
        partitions: Vec<Partition>,
        threshold_bytes: usize,
    ) -> Result<Self, LayoutError> {
        if partitions.is_empty() {
            return Err(LayoutError::Empty);
        }
        if threshold_bytes == 0 {
            return Err(LayoutError::ZeroThreshold);
        }

        let mut names = HashSet::new();
        let mut keys = HashSet::new();
        for partition in &partitions {
            if partition.name.trim().is_empty() || partition.key.trim().is_empty()
            {
                return Err(LayoutError::BlankField);
            }
            if !names.insert(partition.name.as_str()) {
                return Err(LayoutError::DuplicateName(partition.name.clone()));
            }
            if !keys.insert(partition.key.as_str()) {
                return Err(LayoutError::DuplicateKey(partition.key.clone()));
            }
        }

        Ok(Self {
            partitions,
            threshold_bytes,
        })
    }

    /// Same partitions, different threshold.
    pub fn with_threshold(mut self, threshold_bytes: usize) -> Self {
        self.threshold_bytes = threshold_bytes.max(1);
        self
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn threshold_bytes(&self) -> usize {
        self.threshold_bytes
    }

    /// Partitions probed by size before falling back.
    pub fn probed(&self) -> &[Partition] {
        &self.partitions[..self.partitions.len() - 1]
    }

    pub fn fallback(&self) -> &Partition {
        // Non-empty by construction.
        &self.partitions[self.partitions.len() - 1]
    }
}

/// `ratio` of `cap`, rounded to the nearest byte and never zero.
pub fn threshold_for_cap(cap: usize, ratio: f64) -> usize {
    ((cap as f64 * ratio).round() as usize).max(1)
}
