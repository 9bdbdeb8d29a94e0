// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! UI-facing feed operations.
//!
//! [`FeedService`] ties the fetcher to the store. All mutation flows through
//! the store; views are always re-read from it and projected.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use quizfeed_core::{ContentItem, ContentStore, FeedError, LifecycleStatus};

use crate::fetcher::ContentFetcher;
use crate::projector::project;

/// Cheaply cloneable handle over a fetcher and a store.
#[derive(Clone)]
pub struct FeedService {
    fetcher: Arc<ContentFetcher>,
    store: Arc<dyn ContentStore>,
}

impl FeedService {
    pub fn new(fetcher: ContentFetcher, store: Arc<dyn ContentStore>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// The current view for a status and optional category.
    pub async fn list_view(
        &self,
        status: LifecycleStatus,
        category: Option<&str>,
    ) -> Result<Vec<ContentItem>, FeedError> {
        let all = self.store.get_all().await?;
        Ok(project(&all, status, category))
    }

    async fn persist(&self, items: Vec<ContentItem>) -> Result<Vec<ContentItem>, FeedError> {
        match self.store.upsert_many(&items).await {
            Ok(()) => Ok(items),
            Err(source) => {
                warn!(count = items.len(), error = %source, "fetched items could not be stored");
                Err(FeedError::Unpersisted {
                    items,
                    source: Box::new(source),
                })
            }
        }
    }

    /// Fetches a batch and stores it.
    ///
    /// A store failure after a successful fetch is [`FeedError::Unpersisted`]
    /// carrying the fetched items; see [`FeedService::retry_persist`].
    pub async fn request_fetch(&self, prompt: &str) -> Result<Vec<ContentItem>, FeedError> {
        let items = self.fetcher.fetch_batch(prompt).await?;
        let items = self.persist(items).await?;
        info!(count = items.len(), "batch stored");
        Ok(items)
    }

    /// Generates and stores one item for a free-text request.
    pub async fn request_custom(&self, user_request: &str) -> Result<ContentItem, FeedError> {
        let item = self.fetcher.fetch_one(user_request).await?;
        let mut stored = self.persist(vec![item]).await?;
        let item = stored.remove(0);
        info!(id = %item.id, "custom item stored");
        Ok(item)
    }

    /// Stores items from an earlier [`FeedError::Unpersisted`].
    pub async fn retry_persist(&self, items: &[ContentItem]) -> Result<(), FeedError> {
        self.store.upsert_many(items).await
    }

    /// Runs [`FeedService::request_fetch`] on a detached task.
    ///
    /// Dropping the handle abandons interest in the result only; the fetch
    /// still completes and stores its items.
    pub fn spawn_fetch(
        &self,
        prompt: impl Into<String>,
    ) -> JoinHandle<Result<Vec<ContentItem>, FeedError>> {
        let service = self.clone();
        let prompt = prompt.into();
        tokio::spawn(async move {
            let result = service.request_fetch(&prompt).await;
            if let Err(e) = &result {
                warn!(error = %e, "background fetch failed");
            }
            result
        })
    }

    /// Flips an item between active and archived.
    ///
    /// Returns the new status, or `None` for an unknown id.
    pub async fn toggle_archive(&self, id: &str) -> Result<Option<LifecycleStatus>, FeedError> {
        let Some(mut item) = self.store.get(id).await? else {
            debug!(id, "toggle on unknown id");
            return Ok(None);
        };
        item.lifecycle_status = item.lifecycle_status.toggled();
        let status = item.lifecycle_status;
        self.store.upsert_many(&[item]).await?;
        info!(id, %status, "lifecycle status changed");
        Ok(Some(status))
    }

    /// Deletes an item. Unknown ids are not an error.
    pub async fn remove(&self, id: &str) -> Result<(), FeedError> {
        self.store.delete_by_id(id).await?;
        info!(id, "item removed");
        Ok(())
    }

    /// Attaches a generated image to a stored item.
    ///
    /// Items that already carry an image are returned unchanged. The item is
    /// re-read after the image arrives so concurrent edits are kept; if it
    /// was deleted meanwhile the image is discarded and `None` is returned.
    /// An image failure leaves the stored item untouched.
    pub async fn enrich(&self, id: &str) -> Result<Option<ContentItem>, FeedError> {
        let Some(item) = self.store.get(id).await? else {
            return Ok(None);
        };
        if item.generated_image.is_some() {
            return Ok(Some(item));
        }

        let uri = self.fetcher.enrich_with_image(&item).await?;

        let Some(mut current) = self.store.get(id).await? else {
            debug!(id, "item deleted while its image was generated");
            return Ok(None);
        };
        current.generated_image = Some(uri);
        self.store.upsert_many(std::slice::from_ref(&current)).await?;
        info!(id, "image attached");
        Ok(Some(current))
    }

    pub async fn export_now(&self) -> Result<String, FeedError> {
        self.store.export_snapshot().await
    }

    /// Replaces the store from a backup. Invalid backups change nothing.
    pub async fn import_from(&self, contents: &str) -> Result<(), FeedError> {
        self.store.import_snapshot(contents).await
    }
}
