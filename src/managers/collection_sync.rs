//! Collection Synchronizer for Shelfmark.
//!
//! Maintains a local ordered mirror of the remote bookmark collection: one
//! snapshot read at start, then a change-stream subscription whose events are
//! applied to local state in arrival order. Writes never touch the mirror
//! directly — their visible effect round-trips through the stream.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::remote::store::StoreHandle;
use crate::types::bookmark::BookmarkRecord;
use crate::types::errors::SyncError;
use crate::types::event::{ChangeEvent, ChangeKind};
use crate::types::principal::Principal;

/// The mirrored collection plus the snapshot-loading flag.
#[derive(Debug, Default)]
pub struct CollectionState {
    pub bookmarks: Vec<BookmarkRecord>,
    pub loading: bool,
}

/// Shared view of the mirrored collection.
///
/// Written only by the synchronizer's drain task (single writer); read by
/// the rendering layer.
pub type SharedCollection = Arc<RwLock<CollectionState>>;

/// Handle for a running synchronization, released on deactivation.
pub struct SyncHandle {
    drain: JoinHandle<()>,
}

/// Applies one stream event to the collection, in arrival order.
///
/// Inserts are prepended rather than re-sorted, so ordering can drift from
/// strict `created_at` order when events race network delay; known
/// limitation, not silently corrected. Updates and deletes correlate on
/// `id` alone: an update for an unknown id is dropped (no insert-on-missing
/// fallback) and a delete for an unknown id is a no-op.
pub fn apply_event(bookmarks: &mut Vec<BookmarkRecord>, event: ChangeEvent) {
    match event.kind {
        ChangeKind::Insert => bookmarks.insert(0, event.record),
        ChangeKind::Update => {
            if let Some(existing) = bookmarks.iter_mut().find(|b| b.id == event.record.id) {
                *existing = event.record;
            }
        }
        ChangeKind::Delete => bookmarks.retain(|b| b.id != event.record.id),
        ChangeKind::Unknown => {
            tracing::debug!(id = %event.record.id, "ignoring unrecognized stream event kind");
        }
    }
}

/// Collection synchronizer over an injected store handle.
pub struct CollectionSynchronizer {
    store: Arc<dyn StoreHandle>,
    state: SharedCollection,
    revision: watch::Sender<u64>,
}

impl CollectionSynchronizer {
    pub fn new(store: Arc<dyn StoreHandle>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            store,
            state: Arc::new(RwLock::new(CollectionState::default())),
            revision,
        }
    }

    /// Shared view of the mirrored collection.
    pub fn state(&self) -> SharedCollection {
        self.state.clone()
    }

    /// Clone of the current collection, for rendering.
    pub fn bookmarks(&self) -> Vec<BookmarkRecord> {
        self.state.read().bookmarks.clone()
    }

    /// Whether the initial snapshot is still in flight.
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Watch channel bumped on every local-state mutation; observers
    /// re-render when it changes.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Starts synchronization for the given principal: issues the snapshot
    /// read, then opens the change-stream subscription and spawns its drain
    /// task.
    ///
    /// A snapshot failure leaves the collection empty with the loading flag
    /// cleared and is not retried — the caller may re-invoke. A subscription
    /// failure is returned as an error.
    ///
    /// Must not be called again before the previous handle is passed to
    /// [`stop`](Self::stop); two live drain tasks over one state is
    /// undefined.
    pub async fn start(&self, principal: &Principal) -> Result<SyncHandle, SyncError> {
        {
            let mut state = self.state.write();
            state.bookmarks.clear();
            state.loading = true;
        }
        self.bump_revision();

        match self.store.list_for_owner(&principal.id).await {
            Ok(records) => {
                let mut state = self.state.write();
                state.bookmarks = records;
                state.loading = false;
            }
            Err(e) => {
                tracing::warn!(error = %e, "bookmark snapshot load failed");
                self.state.write().loading = false;
            }
        }
        self.bump_revision();

        let mut subscription = self
            .store
            .subscribe(&principal.id)
            .await
            .map_err(|e| SyncError::SubscribeFailed(e.to_string()))?;

        let state = self.state.clone();
        let revision = self.revision.clone();
        let drain = tokio::spawn(async move {
            while let Some(event) = subscription.next_event().await {
                apply_event(&mut state.write().bookmarks, event);
                revision.send_modify(|rev| *rev += 1);
            }
        });

        Ok(SyncHandle { drain })
    }

    /// Releases the subscription. Best-effort: an event delivered just
    /// before release may still be applied.
    pub fn stop(&self, handle: SyncHandle) {
        handle.drain.abort();
    }
}
