//! Two-phase deletion flow for Shelfmark.
//!
//! Phase one marks a record id as pending (pure local state, no network);
//! phase two confirms, issuing the remote delete keyed by that id. The
//! pending marker is cleared on confirmation regardless of outcome, and
//! cancelling before confirmation performs no network call.

use crate::remote::store::BookmarkStore;
use crate::types::errors::StoreError;

/// Deletion flow holding the pending-delete marker.
#[derive(Debug, Default)]
pub struct DeletionFlow {
    pending_delete: Option<String>,
}

impl DeletionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Marks a record as pending deletion. A later request replaces an
    /// earlier, unconfirmed one.
    pub fn request(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    /// Abandons the pending deletion without any store call.
    pub fn cancel(&mut self) {
        self.pending_delete = None;
    }

    /// Confirms the pending deletion, issuing exactly one remote delete.
    ///
    /// The pending marker is cleared whether or not the delete succeeds; a
    /// failure is logged and returned so the caller can surface it. With no
    /// pending marker this is a no-op.
    pub async fn confirm(&mut self, store: &dyn BookmarkStore) -> Result<(), StoreError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(());
        };

        match store.delete(&id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "bookmark delete failed");
                Err(e)
            }
        }
    }
}
