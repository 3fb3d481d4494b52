//! Durable key-value slots
//!
//! The annotation store persists its whole collection as one JSON document
//! under a single key. A slot is anything that can read and overwrite that
//! document synchronously.
//!
//! - [`MemorySlot`] keeps values in process, with an optional byte quota
//! - [`FileSlot`] keeps one `<key>.json` file per key under a directory

mod file;
mod memory;

pub use file::FileSlot;
pub use memory::MemorySlot;

use crate::error::StorageError;

/// A synchronous durable key-value slot
pub trait StorageSlot {
    /// Read the value stored under `key`, `None` if nothing was ever written
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`
    ///
    /// On failure the previously stored value must be left intact.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: StorageSlot + ?Sized> StorageSlot for &S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

impl<S: StorageSlot + ?Sized> StorageSlot for std::rc::Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}
