// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory content store with injectable write failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quizfeed_core::snapshot::{decode_snapshot, encode_snapshot};
use quizfeed_core::{
    AdapterType, ContentItem, ContentStore, FeedError, HealthStatus, PluginAdapter,
};

/// Vector-backed [`ContentStore`] keeping insertion order.
///
/// With [`MemoryStore::fail_writes`] enabled every mutating call returns
/// [`FeedError::StorageUnavailable`] without touching the contents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<Vec<ContentItem>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<ContentItem>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
            ..Self::default()
        }
    }

    /// Toggles simulated write failure.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), FeedError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FeedError::StorageUnavailable {
                source: "simulated write failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Ok(HealthStatus::Degraded("writes failing".into()))
        } else {
            Ok(HealthStatus::Healthy)
        }
    }

    async fn shutdown(&self) -> Result<(), FeedError> {
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn upsert_many(&self, items: &[ContentItem]) -> Result<(), FeedError> {
        self.check_writable()?;
        for item in items {
            item.validate()
                .map_err(|reason| FeedError::Internal(format!("refusing to store item: {reason}")))?;
        }
        let mut stored = self.items.lock().await;
        for item in items {
            match stored.iter_mut().find(|s| s.id == item.id) {
                Some(existing) => *existing = item.clone(),
                None => stored.push(item.clone()),
            }
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<ContentItem>, FeedError> {
        Ok(self.items.lock().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<ContentItem>, FeedError> {
        Ok(self.items.lock().await.iter().find(|i| i.id == id).cloned())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), FeedError> {
        self.check_writable()?;
        self.items.lock().await.retain(|i| i.id != id);
        Ok(())
    }

    async fn export_snapshot(&self) -> Result<String, FeedError> {
        encode_snapshot(&self.items.lock().await)
    }

    async fn import_snapshot(&self, blob: &str) -> Result<(), FeedError> {
        let items = decode_snapshot(blob)?;
        self.check_writable()?;
        *self.items.lock().await = items;
        Ok(())
    }
}
