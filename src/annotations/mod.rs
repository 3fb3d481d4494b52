//! Annotation module
//!
//! Feedback records bound to document elements, and the store that owns them.
//!
//! # Features
//!
//! - Insertion-ordered collection with immutable snapshots
//! - Whole-collection persistence to a [`StorageSlot`](crate::storage::StorageSlot)
//! - Lazy 7-day retention, applied when the store is opened
//! - Synchronous change notification with explicit disposers

mod id;
mod listeners;
mod store;
mod types;

pub use id::generate_id;
pub use listeners::Subscription;
pub use store::{AnnotationStore, Snapshot, RETENTION_DAYS, STORAGE_KEY};
pub use types::{
    Annotation, AnnotationPatch, BoundingBox, Intent, NewAnnotation, Severity, Status,
};
