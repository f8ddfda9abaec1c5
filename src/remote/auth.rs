//! Authentication provider seam.
//!
//! Session and token lifecycle belong entirely to the external provider;
//! this client only asks "who is signed in right now" and hands off
//! sign-in/sign-out.

use async_trait::async_trait;

use crate::types::errors::AuthError;
use crate::types::principal::Principal;

/// Trait defining the authentication provider interface.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolves the currently authenticated principal, if any.
    async fn current_principal(&self) -> Result<Option<Principal>, AuthError>;

    /// Begins a provider-based sign-in (e.g. "github", "google").
    ///
    /// Returns the authorization URL the caller should navigate to; the
    /// provider redirects back to `redirect_to` when done.
    async fn sign_in_with_provider(
        &self,
        provider: &str,
        redirect_to: &str,
    ) -> Result<String, AuthError>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Fixed-principal provider for the demo binary and tests.
///
/// `sign_out` clears the principal for the lifetime of the value.
pub struct StaticAuth {
    principal: parking_lot::Mutex<Option<Principal>>,
}

impl StaticAuth {
    pub fn signed_in(principal: Principal) -> Self {
        Self {
            principal: parking_lot::Mutex::new(Some(principal)),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            principal: parking_lot::Mutex::new(None),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn current_principal(&self) -> Result<Option<Principal>, AuthError> {
        Ok(self.principal.lock().clone())
    }

    async fn sign_in_with_provider(
        &self,
        provider: &str,
        redirect_to: &str,
    ) -> Result<String, AuthError> {
        Ok(format!("static://{}?redirect_to={}", provider, redirect_to))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.principal.lock() = None;
        Ok(())
    }
}
