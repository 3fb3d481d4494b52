//! Persistent annotation store
//!
//! Owns the canonical, insertion-ordered collection. Every mutation builds a
//! new immutable snapshot, writes the whole collection back to the durable
//! slot, then notifies subscribers.
//!
//! Records older than [`RETENTION_DAYS`] are dropped when the store is
//! opened; there is no background sweep. Live entries this build cannot
//! read are kept verbatim in the slot and written back after the readable
//! ones.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;

use super::id::generate_id;
use super::listeners::{Listeners, Subscription};
use super::types::{Annotation, AnnotationPatch, NewAnnotation, Status};
use crate::error::StorageError;
use crate::storage::StorageSlot;

/// Key the collection is persisted under
pub const STORAGE_KEY: &str = "vue-agentation-annotations";

/// Retention window for persisted annotations
pub const RETENTION_DAYS: i64 = 7;

/// Immutable view of the collection at one point in time
pub type Snapshot = Arc<[Annotation]>;

/// Annotation collection backed by a durable slot
pub struct AnnotationStore<S: StorageSlot> {
    slot: S,
    key: String,
    url: String,
    annotations: Snapshot,
    /// Live persisted entries that do not decode as [`Annotation`]
    retained: Vec<Value>,
    listeners: Listeners,
}

impl<S: StorageSlot> AnnotationStore<S> {
    /// Open the store under the default key for document context `url`
    pub fn open(slot: S, url: impl Into<String>) -> Self {
        Self::open_with_key(slot, STORAGE_KEY, url)
    }

    /// Open the store under a custom key
    ///
    /// Missing, unreadable or corrupt persisted data yields an empty store.
    /// When expired records are evicted the slot is rewritten.
    pub fn open_with_key(slot: S, key: &str, url: impl Into<String>) -> Self {
        let loaded = load(&slot, key, Utc::now().timestamp_millis()).unwrap_or_else(|e| {
            tracing::warn!("Could not read annotations: {}", e);
            Loaded::default()
        });
        Self::from_loaded(slot, key, url.into(), loaded)
    }

    /// Like [`AnnotationStore::open`], but fails when the slot cannot be read
    pub fn try_open(slot: S, url: impl Into<String>) -> Result<Self, StorageError> {
        Self::try_open_with_key(slot, STORAGE_KEY, url)
    }

    /// Like [`AnnotationStore::open_with_key`], but fails when the slot
    /// cannot be read
    ///
    /// Corrupt contents still load as an empty store.
    pub fn try_open_with_key(
        slot: S,
        key: &str,
        url: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let loaded = load(&slot, key, Utc::now().timestamp_millis())?;
        Ok(Self::from_loaded(slot, key, url.into(), loaded))
    }

    fn from_loaded(slot: S, key: &str, url: String, loaded: Loaded) -> Self {
        let store = Self {
            slot,
            key: key.to_string(),
            url,
            annotations: loaded.annotations.into(),
            retained: loaded.retained,
            listeners: Listeners::default(),
        };

        if !store.retained.is_empty() {
            tracing::warn!(
                "Keeping {} unreadable annotation(s) under {}",
                store.retained.len(),
                key
            );
        }
        if loaded.evicted > 0 {
            tracing::debug!("Evicted {} stale annotation(s) from {}", loaded.evicted, key);
            store.persist();
        }

        store
    }

    /// Current document context used by [`AnnotationStore::add`]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Change the document context for subsequent additions
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying slot
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Create an annotation from caller fields
    pub fn add(&mut self, fields: NewAnnotation) -> Annotation {
        let now = Utc::now().timestamp_millis();
        let mut id = generate_id(now);
        while self.contains(&id) {
            id = generate_id(now);
        }

        let annotation = fields.into_annotation(id, now, &self.url);
        tracing::debug!("Adding annotation {} on {}", annotation.id, annotation.url);

        let mut next = self.annotations.to_vec();
        next.push(annotation.clone());
        self.commit(next);

        annotation
    }

    /// Shallow-merge `patch` into the annotation with `id`
    ///
    /// Returns `None` without persisting or notifying when `id` is unknown.
    pub fn update(&mut self, id: &str, patch: AnnotationPatch) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id == id)?;

        let updated = patch.apply(&self.annotations[index]);
        let mut next = self.annotations.to_vec();
        next[index] = updated.clone();
        self.commit(next);

        Some(updated)
    }

    /// Mark an annotation resolved, recording who resolved it
    pub fn resolve(&mut self, id: &str, resolved_by: Option<&str>) -> Option<Annotation> {
        self.update(
            id,
            AnnotationPatch {
                status: Some(Status::Resolved),
                resolved_at: Some(Utc::now().to_rfc3339()),
                resolved_by: Some(resolved_by.unwrap_or("human").to_string()),
                ..Default::default()
            },
        )
    }

    /// Remove the annotation with `id`
    ///
    /// Persists and notifies even when nothing matched.
    pub fn remove(&mut self, id: &str) {
        self.retained
            .retain(|entry| entry.get("id").and_then(Value::as_str) != Some(id));
        let next: Vec<Annotation> = self
            .annotations
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        self.commit(next);
    }

    /// Remove annotations for `url`, or everything when `url` is `None`
    pub fn clear(&mut self, url: Option<&str>) {
        match url {
            Some(url) => self
                .retained
                .retain(|entry| entry.get("url").and_then(Value::as_str) != Some(url)),
            None => self.retained.clear(),
        }

        let next: Vec<Annotation> = match url {
            Some(url) => self
                .annotations
                .iter()
                .filter(|a| a.url != url)
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        self.commit(next);
    }

    /// Snapshot of every annotation in insertion order
    pub fn get_all(&self) -> Snapshot {
        Arc::clone(&self.annotations)
    }

    /// Annotations whose `url` equals `url` exactly, in insertion order
    pub fn get_by_url(&self, url: &str) -> Vec<Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.url == url)
            .cloned()
            .collect()
    }

    /// Copy of a single annotation
    pub fn get(&self, id: &str) -> Option<Annotation> {
        self.annotations.iter().find(|a| a.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Register `callback`
    ///
    /// It receives the current snapshot immediately and a fresh one after
    /// every committed mutation. It must not mutate this store.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.listeners.subscribe(callback, &self.annotations)
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn contains(&self, id: &str) -> bool {
        self.annotations.iter().any(|a| a.id == id)
    }

    fn commit(&mut self, next: Vec<Annotation>) {
        self.annotations = next.into();
        self.persist();

        let snapshot = Arc::clone(&self.annotations);
        self.listeners.notify(&snapshot);
    }

    /// Write the whole collection; failures are logged and swallowed
    fn persist(&self) {
        let mut entries = match self
            .annotations
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()
        {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Could not serialize annotations: {}", e);
                return;
            }
        };
        entries.extend(self.retained.iter().cloned());

        let json = Value::Array(entries).to_string();
        if let Err(e) = self.slot.write(&self.key, &json) {
            tracing::warn!("Could not save annotations: {}", e);
        }
    }
}

impl<S: StorageSlot> std::fmt::Debug for AnnotationStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("key", &self.key)
            .field("url", &self.url)
            .field("annotations", &self.annotations.len())
            .field("retained", &self.retained.len())
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

#[derive(Default)]
struct Loaded {
    annotations: Vec<Annotation>,
    retained: Vec<Value>,
    evicted: usize,
}

/// Read the persisted collection as of `now` (Unix ms)
///
/// Entries without a numeric timestamp, or at least [`RETENTION_DAYS`] old,
/// are evicted. Live entries that fail to decode, or repeat an id, are
/// retained verbatim.
fn load<S: StorageSlot>(slot: &S, key: &str, now: i64) -> Result<Loaded, StorageError> {
    let mut loaded = Loaded::default();

    let Some(raw) = slot.read(key)? else {
        return Ok(loaded);
    };

    let entries: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Ignoring corrupt annotation data under {}: {}", key, e);
            return Ok(loaded);
        }
    };

    let window = Duration::days(RETENTION_DAYS).num_milliseconds();
    for entry in entries {
        let expired = match stored_timestamp(&entry) {
            Some(timestamp) => now.saturating_sub(timestamp) >= window,
            None => true,
        };
        if expired {
            loaded.evicted += 1;
            continue;
        }

        match serde_json::from_value::<Annotation>(entry.clone()) {
            Ok(annotation) if !loaded.annotations.iter().any(|a| a.id == annotation.id) => {
                loaded.annotations.push(annotation);
            }
            Ok(annotation) => {
                tracing::warn!("Duplicate annotation id {}", annotation.id);
                loaded.retained.push(entry);
            }
            Err(e) => {
                tracing::warn!("Unreadable annotation: {}", e);
                loaded.retained.push(entry);
            }
        }
    }

    Ok(loaded)
}

fn stored_timestamp(entry: &Value) -> Option<i64> {
    let timestamp = entry.get("timestamp")?;
    // float-to-int casts saturate
    timestamp
        .as_i64()
        .or_else(|| timestamp.as_f64().map(|ms| ms as i64))
}
