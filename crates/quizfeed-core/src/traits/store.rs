// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content store trait for local persistence backends.

use async_trait::async_trait;

use crate::error::FeedError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ContentItem;

/// Persistent set of content items keyed by id.
///
/// Every operation is atomic from the caller's perspective. Concurrent
/// writes to the same id are last-writer-wins with no merging.
#[async_trait]
pub trait ContentStore: PluginAdapter {
    /// Inserts or fully replaces each item by id, all or nothing.
    async fn upsert_many(&self, items: &[ContentItem]) -> Result<(), FeedError>;

    /// Returns every stored item in stable storage order.
    async fn get_all(&self) -> Result<Vec<ContentItem>, FeedError>;

    /// Returns one item, or `None` if the id is unknown.
    async fn get(&self, id: &str) -> Result<Option<ContentItem>, FeedError>;

    /// Removes an item. Unknown ids are not an error.
    async fn delete_by_id(&self, id: &str) -> Result<(), FeedError>;

    /// Serializes the whole store into a versioned backup envelope.
    async fn export_snapshot(&self) -> Result<String, FeedError>;

    /// Replaces the whole store with the snapshot's items.
    ///
    /// On [`FeedError::InvalidBackup`] or any storage failure the previous
    /// contents are left intact.
    async fn import_snapshot(&self, blob: &str) -> Result<(), FeedError>;
}
