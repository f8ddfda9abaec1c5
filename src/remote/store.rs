//! Durable store and change feed seams.
//!
//! Access control — a principal only sees and mutates its own records — is
//! entirely the store's responsibility; nothing here re-checks ownership.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::types::bookmark::{BookmarkDraft, BookmarkRecord};
use crate::types::errors::StoreError;
use crate::types::event::ChangeEvent;

/// Trait defining one-shot operations against the durable store.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Snapshot read: all records for the owner, descending by creation time.
    async fn list_for_owner(&self, owner: &str) -> Result<Vec<BookmarkRecord>, StoreError>;

    /// Inserts one record. The store assigns `id` and `created_at` and
    /// returns the stored record.
    async fn insert(&self, draft: BookmarkDraft) -> Result<BookmarkRecord, StoreError>;

    /// Deletes the record with the given id. Deleting an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Trait defining the change-stream subscription.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Opens a subscription scoped to the owner's records.
    async fn subscribe(&self, owner: &str) -> Result<Subscription, StoreError>;
}

/// The explicitly-passed store handle: one object implementing both seams.
pub trait StoreHandle: BookmarkStore + ChangeFeed {}

impl<T: BookmarkStore + ChangeFeed> StoreHandle for T {}

/// A live change-stream subscription.
///
/// Events arrive in delivery order on an unbounded channel; the producer
/// task (broadcast forwarder, SSE reader, ...) is aborted when the
/// subscription is closed or dropped, which tears the feed down.
pub struct Subscription {
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    producer: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(
        events: mpsc::UnboundedReceiver<ChangeEvent>,
        producer: Option<JoinHandle<()>>,
    ) -> Self {
        Self { events, producer }
    }

    /// Receives the next event. Returns `None` once the feed has ended and
    /// all delivered events were drained.
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }

    /// Releases the subscription. Events already delivered to the channel
    /// may still be drained afterwards; no new ones arrive.
    pub fn close(&mut self) {
        if let Some(task) = self.producer.take() {
            task.abort();
        }
        self.events.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.producer.take() {
            task.abort();
        }
    }
}
