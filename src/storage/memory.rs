//! In-process slot

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::StorageSlot;
use crate::error::StorageError;

/// In-memory slot with an optional per-value byte quota
///
/// Counts successful writes so callers can observe persistence traffic.
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: RefCell<HashMap<String, String>>,
    capacity: Option<usize>,
    writes: Cell<usize>,
}

impl MemorySlot {
    /// Create an empty slot without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty slot rejecting values longer than `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Seed a value without counting it as a write
    pub fn seed(&self, key: &str, value: impl Into<String>) {
        self.values.borrow_mut().insert(key.to_string(), value.into());
    }

    /// Current raw value under `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(capacity) = self.capacity {
            if value.len() > capacity {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    capacity,
                });
            }
        }

        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
