// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ContentStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use quizfeed_config::model::StorageConfig;
use quizfeed_core::snapshot::{decode_snapshot, encode_snapshot};
use quizfeed_core::{
    AdapterType, ContentItem, ContentStore, FeedError, HealthStatus, PluginAdapter,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed content store.
///
/// Wraps a [`Database`] handle and delegates to [`queries::items`]. The
/// database is opened on the first call to [`SqliteContentStore::initialize`].
pub struct SqliteContentStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteContentStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Opens a store over an already-open database.
    pub fn from_database(db: Database) -> Self {
        Self {
            config: StorageConfig {
                database_path: ":memory:".to_string(),
                wal_mode: false,
            },
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// Opens the database and applies migrations.
    pub async fn initialize(&self) -> Result<(), FeedError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| FeedError::StorageUnavailable {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite content store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, FeedError> {
        self.db.get().ok_or_else(|| FeedError::StorageUnavailable {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteContentStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get(0))
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FeedError> {
        if let Some(db) = self.db.get()
            && self.config.wal_mode
        {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn upsert_many(&self, items: &[ContentItem]) -> Result<(), FeedError> {
        queries::items::upsert_many(self.db()?, items).await
    }

    async fn get_all(&self) -> Result<Vec<ContentItem>, FeedError> {
        queries::items::get_all(self.db()?).await
    }

    async fn get(&self, id: &str) -> Result<Option<ContentItem>, FeedError> {
        queries::items::get(self.db()?, id).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), FeedError> {
        queries::items::delete_by_id(self.db()?, id).await
    }

    async fn export_snapshot(&self) -> Result<String, FeedError> {
        let items = self.get_all().await?;
        encode_snapshot(&items)
    }

    async fn import_snapshot(&self, blob: &str) -> Result<(), FeedError> {
        let db = self.db()?;
        let items = decode_snapshot(blob)?;
        let count = items.len();
        queries::items::replace_all(db, items).await?;
        info!(count, "store replaced from backup");
        Ok(())
    }
}
