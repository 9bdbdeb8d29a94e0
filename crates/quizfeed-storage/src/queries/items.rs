// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content item CRUD operations.

use std::str::FromStr;

use quizfeed_core::{ContentItem, FeedError, LifecycleStatus};
use rusqlite::{params, Row, Transaction};
use tracing::warn;

use crate::database::{map_tr_err, Database};

const SELECT_COLUMNS: &str = "SELECT id, prompt, hook, explanation, solution, category, \
     style_hint, generated_image, created_at, lifecycle_status FROM content_items";

const UPSERT: &str = "INSERT INTO content_items (id, prompt, hook, explanation, solution, \
     category, style_hint, generated_image, created_at, lifecycle_status) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
     ON CONFLICT(id) DO UPDATE SET \
     prompt = excluded.prompt, hook = excluded.hook, explanation = excluded.explanation, \
     solution = excluded.solution, category = excluded.category, \
     style_hint = excluded.style_hint, generated_image = excluded.generated_image, \
     created_at = excluded.created_at, lifecycle_status = excluded.lifecycle_status";

/// A row as read from SQLite, before domain validation.
struct StoredRow {
    id: String,
    prompt: String,
    hook: Option<String>,
    explanation: String,
    solution: String,
    category: String,
    style_hint: String,
    generated_image: Option<String>,
    created_at: i64,
    lifecycle_status: String,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            prompt: row.get(1)?,
            hook: row.get(2)?,
            explanation: row.get(3)?,
            solution: row.get(4)?,
            category: row.get(5)?,
            style_hint: row.get(6)?,
            generated_image: row.get(7)?,
            created_at: row.get(8)?,
            lifecycle_status: row.get(9)?,
        })
    }

    fn into_item(self) -> Result<ContentItem, String> {
        let lifecycle_status = LifecycleStatus::from_str(&self.lifecycle_status)
            .map_err(|_| format!("unknown lifecycle status `{}`", self.lifecycle_status))?;
        let item = ContentItem {
            id: self.id,
            prompt: self.prompt,
            hook: self.hook,
            explanation: self.explanation,
            solution: self.solution,
            category: self.category,
            style_hint: self.style_hint,
            generated_image: self.generated_image,
            created_at: self.created_at,
            lifecycle_status,
        };
        item.validate()?;
        Ok(item)
    }
}

/// Column type mismatches mark a single corrupt row rather than a broken store.
fn is_row_corruption(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::InvalidColumnType(..) | rusqlite::Error::FromSqlConversionFailure(..)
    )
}

fn decode(row: rusqlite::Result<StoredRow>) -> rusqlite::Result<Option<ContentItem>> {
    match row {
        Ok(stored) => {
            let id = stored.id.clone();
            match stored.into_item() {
                Ok(item) => Ok(Some(item)),
                Err(reason) => {
                    warn!(id = %id, reason = %reason, "skipping corrupt content row");
                    Ok(None)
                }
            }
        }
        Err(e) if is_row_corruption(&e) => {
            warn!(error = %e, "skipping undecodable content row");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn upsert_in(tx: &Transaction<'_>, items: &[ContentItem]) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare_cached(UPSERT)?;
    for item in items {
        stmt.execute(params![
            item.id,
            item.prompt,
            item.hook,
            item.explanation,
            item.solution,
            item.category,
            item.style_hint,
            item.generated_image,
            item.created_at,
            item.lifecycle_status.to_string(),
        ])?;
    }
    Ok(())
}

fn ensure_valid(items: &[ContentItem]) -> Result<(), FeedError> {
    for item in items {
        item.validate()
            .map_err(|reason| FeedError::Internal(format!("refusing to store item: {reason}")))?;
    }
    Ok(())
}

/// Inserts or fully replaces every item inside one transaction.
pub async fn upsert_many(db: &Database, items: &[ContentItem]) -> Result<(), FeedError> {
    if items.is_empty() {
        return Ok(());
    }
    ensure_valid(items)?;
    let items = items.to_vec();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            upsert_in(&tx, &items)?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Returns every decodable item in rowid order. Corrupt rows are skipped.
pub async fn get_all(db: &Database) -> Result<Vec<ContentItem>, FeedError> {
    db.connection()
        .call(|conn| -> Result<Vec<ContentItem>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid ASC"))?;
            let rows = stmt.query_map([], StoredRow::from_row)?;
            let mut items = Vec::new();
            for row in rows {
                if let Some(item) = decode(row)? {
                    items.push(item);
                }
            }
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}

/// Returns one item by id. A corrupt row reads as absent.
pub async fn get(db: &Database, id: &str) -> Result<Option<ContentItem>, FeedError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ContentItem>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], StoredRow::from_row);
            match result {
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                other => decode(other),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes an item. Unknown ids are a no-op.
pub async fn delete_by_id(db: &Database, id: &str) -> Result<(), FeedError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute("DELETE FROM content_items WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Replaces the entire table contents in one transaction.
///
/// Callers validate `items` first; if any statement fails the transaction
/// rolls back and the previous contents remain.
pub async fn replace_all(db: &Database, items: Vec<ContentItem>) -> Result<(), FeedError> {
    ensure_valid(&items)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM content_items", [])?;
            upsert_in(&tx, &items)?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}
