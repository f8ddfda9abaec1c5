//! Bookmark submission flow for Shelfmark.
//!
//! Validates the form, derives the title and tags, resolves the principal,
//! and issues a single insert. The mirrored collection is not touched: the
//! insert becomes visible when its event arrives through the stream.

use crate::remote::auth::AuthProvider;
use crate::remote::store::BookmarkStore;
use crate::types::bookmark::{BookmarkForm, BookmarkRecord};
use crate::types::errors::SubmitError;

/// Submission flow owning the transient form state.
pub struct SubmissionFlow {
    pub form: BookmarkForm,
    submitting: bool,
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self {
            form: BookmarkForm::default(),
            submitting: false,
        }
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submits the current form.
    ///
    /// On success the form is cleared and the stored record returned so the
    /// caller can dismiss its modal. On failure the form is left intact for
    /// retry. Validation and the principal check both abort before any
    /// write.
    pub async fn submit(
        &mut self,
        auth: &dyn AuthProvider,
        store: &dyn BookmarkStore,
    ) -> Result<BookmarkRecord, SubmitError> {
        if self.form.url.trim().is_empty() {
            return Err(SubmitError::MissingUrl);
        }

        self.submitting = true;
        let result = self.submit_inner(auth, store).await;
        self.submitting = false;

        match &result {
            Ok(record) => {
                tracing::debug!(id = %record.id, "bookmark submitted");
                self.form.clear();
            }
            Err(e) => tracing::warn!(error = %e, "bookmark submission failed"),
        }
        result
    }

    async fn submit_inner(
        &self,
        auth: &dyn AuthProvider,
        store: &dyn BookmarkStore,
    ) -> Result<BookmarkRecord, SubmitError> {
        let principal = auth
            .current_principal()
            .await
            .map_err(|e| SubmitError::AuthFailed(e.to_string()))?
            .ok_or(SubmitError::NotAuthenticated)?;

        let draft = self.form.assemble(&principal.id);
        store
            .insert(draft)
            .await
            .map_err(|e| SubmitError::StoreFailed(e.to_string()))
    }
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self::new()
    }
}
