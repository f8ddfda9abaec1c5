//! Embedded store implementation of the collaborator seams.
//!
//! `LocalStore` keeps the collection in SQLite and fans change events out on
//! a broadcast channel, giving the demo binary and the tests a store whose
//! observable behavior matches the remote contract: store-assigned ids and
//! timestamps, owner-scoped reads, and insert/update/delete notifications.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::params;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::database::Database;
use crate::remote::store::{BookmarkStore, ChangeFeed, Subscription};
use crate::types::bookmark::{BookmarkDraft, BookmarkRecord, Category};
use crate::types::errors::StoreError;
use crate::types::event::ChangeEvent;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Store implementation backed by the embedded SQLite database.
pub struct LocalStore {
    db: Arc<Database>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl LocalStore {
    pub fn new(db: Arc<Database>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { db, changes }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Reads a single bookmark row into a record.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<BookmarkRecord> {
        let category: String = row.get(5)?;
        let tags_json: String = row.get(6)?;
        Ok(BookmarkRecord {
            id: row.get(0)?,
            owner: row.get(1)?,
            url: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            category: Category::parse(&category),
            tags: serde_json::from_str(&tags_json).unwrap_or_default(),
            is_favorite: row.get::<_, i64>(7)? != 0,
            created_at: row.get(8)?,
        })
    }

    fn get_record(&self, id: &str) -> Result<Option<BookmarkRecord>, StoreError> {
        let conn = self.db.connection();
        let result = conn.query_row(
            "SELECT id, owner, url, title, description, category, tags, is_favorite, created_at \
             FROM bookmarks WHERE id = ?1",
            params![id],
            Self::row_to_record,
        );
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn publish(&self, event: ChangeEvent) {
        // No live subscribers is fine; the event is simply not observed.
        let _ = self.changes.send(event);
    }

    /// Persists an externally-edited record and emits an update event.
    ///
    /// Not part of the store seam — client code never updates records — but
    /// the demo and tests use it to simulate out-of-band edits arriving
    /// through the stream.
    pub fn apply_update(&self, record: &BookmarkRecord) -> Result<(), StoreError> {
        let tags_json = serde_json::to_string(&record.tags)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let affected = self
            .db
            .connection()
            .execute(
                "UPDATE bookmarks SET url = ?1, title = ?2, description = ?3, category = ?4, \
                 tags = ?5, is_favorite = ?6 WHERE id = ?7",
                params![
                    record.url,
                    record.title,
                    record.description,
                    record.category.as_str(),
                    tags_json,
                    record.is_favorite as i64,
                    record.id
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if affected > 0 {
            self.publish(ChangeEvent::update(record.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for LocalStore {
    /// Owner-scoped snapshot, most recently created first.
    async fn list_for_owner(&self, owner: &str) -> Result<Vec<BookmarkRecord>, StoreError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, owner, url, title, description, category, tags, is_favorite, created_at \
                 FROM bookmarks WHERE owner = ?1 ORDER BY created_at DESC",
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![owner], Self::row_to_record)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(results)
    }

    /// Inserts a record, assigning id and creation time, and emits an insert
    /// event.
    async fn insert(&self, draft: BookmarkDraft) -> Result<BookmarkRecord, StoreError> {
        let record = BookmarkRecord {
            id: Uuid::new_v4().to_string(),
            owner: draft.owner,
            url: draft.url,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            tags: draft.tags,
            is_favorite: draft.is_favorite,
            created_at: Self::now(),
        };

        let tags_json = serde_json::to_string(&record.tags)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.db
            .connection()
            .execute(
                "INSERT INTO bookmarks (id, owner, url, title, description, category, tags, is_favorite, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.owner,
                    record.url,
                    record.title,
                    record.description,
                    record.category.as_str(),
                    tags_json,
                    record.is_favorite as i64,
                    record.created_at
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        self.publish(ChangeEvent::insert(record.clone()));
        Ok(record)
    }

    /// Deletes by id and emits a delete event when a row was actually
    /// removed. Deleting an absent id is a silent no-op.
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let Some(record) = self.get_record(id)? else {
            return Ok(());
        };

        let affected = self
            .db
            .connection()
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if affected > 0 {
            self.publish(ChangeEvent::delete(record));
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeFeed for LocalStore {
    /// Subscribes to the owner's slice of the change stream.
    async fn subscribe(&self, owner: &str) -> Result<Subscription, StoreError> {
        let mut rx = self.changes.subscribe();
        let (tx, events) = mpsc::unbounded_channel();
        let owner = owner.to_string();

        let producer = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if event.record.owner != owner {
                            continue;
                        }
                        if tx.send(event).is_err() {
                            break; // subscriber gone
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "change feed subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(events, Some(producer)))
    }
}
