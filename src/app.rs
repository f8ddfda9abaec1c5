//! App Core for Shelfmark.
//!
//! Central struct wiring the injected collaborators (auth provider, store
//! handle) with the synchronizer and the user flows, and managing the
//! mirror's activation lifecycle.

use std::sync::Arc;

use crate::managers::collection_sync::{CollectionSynchronizer, SyncHandle};
use crate::managers::deletion::DeletionFlow;
use crate::managers::submission::SubmissionFlow;
use crate::remote::auth::AuthProvider;
use crate::remote::store::StoreHandle;
use crate::types::bookmark::BookmarkRecord;
use crate::types::errors::{AuthError, StoreError, SubmitError, SyncError};
use crate::types::principal::Principal;

/// Central application struct.
///
/// The auth provider and store handle are passed in explicitly — there is no
/// shared client singleton. The mirrored collection lives for the span
/// between `activate` and `deactivate`.
pub struct App {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn StoreHandle>,
    pub synchronizer: CollectionSynchronizer,
    pub submission: SubmissionFlow,
    pub deletion: DeletionFlow,
    sync_handle: Option<SyncHandle>,
}

impl App {
    pub fn new(auth: Arc<dyn AuthProvider>, store: Arc<dyn StoreHandle>) -> Self {
        let synchronizer = CollectionSynchronizer::new(store.clone());
        Self {
            auth,
            store,
            synchronizer,
            submission: SubmissionFlow::new(),
            deletion: DeletionFlow::new(),
            sync_handle: None,
        }
    }

    /// Resolves the principal and starts the collection mirror.
    ///
    /// Re-activating first releases the previous handle.
    pub async fn activate(&mut self) -> Result<Principal, ActivateError> {
        let principal = self
            .auth
            .current_principal()
            .await
            .map_err(ActivateError::Auth)?
            .ok_or(ActivateError::Auth(AuthError::NotAuthenticated))?;

        if let Some(handle) = self.sync_handle.take() {
            self.synchronizer.stop(handle);
        }
        let handle = self
            .synchronizer
            .start(&principal)
            .await
            .map_err(ActivateError::Sync)?;
        self.sync_handle = Some(handle);
        Ok(principal)
    }

    /// Tears down the mirror's subscription.
    pub fn deactivate(&mut self) {
        if let Some(handle) = self.sync_handle.take() {
            self.synchronizer.stop(handle);
        }
    }

    /// Whether the mirror is currently active.
    pub fn is_active(&self) -> bool {
        self.sync_handle.is_some()
    }

    /// Current rendering snapshot of the mirrored collection.
    pub fn bookmarks(&self) -> Vec<BookmarkRecord> {
        self.synchronizer.bookmarks()
    }

    /// Submits the current form through the submission flow.
    pub async fn submit_bookmark(&mut self) -> Result<BookmarkRecord, SubmitError> {
        self.submission
            .submit(self.auth.as_ref(), self.store.as_ref())
            .await
    }

    /// Confirms the pending deletion through the deletion flow.
    pub async fn confirm_delete(&mut self) -> Result<(), StoreError> {
        self.deletion.confirm(self.store.as_ref()).await
    }
}

/// Errors from app activation.
#[derive(Debug)]
pub enum ActivateError {
    Auth(AuthError),
    Sync(SyncError),
}

impl std::fmt::Display for ActivateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivateError::Auth(e) => write!(f, "Activation failed: {}", e),
            ActivateError::Sync(e) => write!(f, "Activation failed: {}", e),
        }
    }
}

impl std::error::Error for ActivateError {}
