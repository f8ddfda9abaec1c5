//! HTTP implementation of the collaborator seams for a PostgREST/GoTrue-style
//! backend: REST reads and writes, bearer-token auth, and a server-sent-events
//! change stream.

use async_trait::async_trait;
use futures_util::StreamExt;
use parking_lot::RwLock;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::types::bookmark::{BookmarkDraft, BookmarkRecord};
use crate::types::errors::{AuthError, StoreError};
use crate::types::event::ChangeEvent;

use super::auth::AuthProvider;
use super::store::{BookmarkStore, ChangeFeed, Subscription};

/// HTTP client for the remote backend.
///
/// The API key identifies the application; the access token, when present,
/// identifies the signed-in principal. Row-level access control happens on
/// the backend.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

/// Profile payload returned by the auth endpoint.
#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: RwLock::new(None),
        }
    }

    /// Installs the access token obtained from the provider's redirect.
    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.header("apikey", &self.api_key);
        match self.access_token.read().as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn rest_url(&self, query: &str) -> String {
        format!("{}/rest/v1/bookmarks{}", self.base_url, query)
    }
}

#[async_trait]
impl AuthProvider for RestClient {
    async fn current_principal(
        &self,
    ) -> Result<Option<crate::types::principal::Principal>, AuthError> {
        if self.access_token.read().is_none() {
            return Ok(None);
        }

        let response = self
            .authed(self.http.get(format!("{}/auth/v1/user", self.base_url)))
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let user: UserPayload = response
            .error_for_status()
            .map_err(|e| AuthError::ProviderError(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        Ok(Some(crate::types::principal::Principal {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            avatar_url: user.avatar_url,
        }))
    }

    async fn sign_in_with_provider(
        &self,
        provider: &str,
        redirect_to: &str,
    ) -> Result<String, AuthError> {
        // The provider handshake happens in the user's browser; this client
        // only constructs the authorize URL.
        Ok(format!(
            "{}/auth/v1/authorize?provider={}&redirect_to={}",
            self.base_url, provider, redirect_to
        ))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let response = self
            .authed(self.http.post(format!("{}/auth/v1/logout", self.base_url)))
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;
        self.set_access_token(None);
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for RestClient {
    async fn list_for_owner(&self, owner: &str) -> Result<Vec<BookmarkRecord>, StoreError> {
        let url = self.rest_url(&format!("?owner=eq.{}&order=created_at.desc", owner));
        let records = self
            .authed(self.http.get(url))
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Remote(e.to_string()))?
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(records)
    }

    async fn insert(&self, draft: BookmarkDraft) -> Result<BookmarkRecord, StoreError> {
        let mut records: Vec<BookmarkRecord> = self
            .authed(self.http.post(self.rest_url("")))
            .header("Prefer", "return=representation")
            .json(&draft)
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Remote(e.to_string()))?
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        records
            .pop()
            .ok_or_else(|| StoreError::Remote("insert returned no record".to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.rest_url(&format!("?id=eq.{}", id));
        self.authed(self.http.delete(url))
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Remote(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ChangeFeed for RestClient {
    /// Opens the SSE change stream and forwards decoded events.
    ///
    /// Malformed frames are logged and skipped; the stream ending closes the
    /// subscription (background failure policy — no error dialog).
    async fn subscribe(&self, owner: &str) -> Result<Subscription, StoreError> {
        let url = format!(
            "{}/realtime/v1/bookmarks?owner=eq.{}",
            self.base_url, owner
        );
        let response = self
            .authed(self.http.get(url))
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Remote(e.to_string()))?;

        let (tx, events) = mpsc::unbounded_channel();
        let producer = tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut buffer = String::new();
            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!(error = %e, "change stream read failed");
                        break;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));
                for payload in drain_sse_frames(&mut buffer) {
                    match serde_json::from_str::<ChangeEvent>(&payload) {
                        Ok(event) => {
                            if tx.send(event).is_err() {
                                return; // subscriber gone
                            }
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "skipping undecodable stream frame");
                        }
                    }
                }
            }
        });

        Ok(Subscription::new(events, Some(producer)))
    }
}

/// Extracts the `data:` payloads of all complete SSE frames in `buffer`,
/// leaving any trailing partial frame in place.
fn drain_sse_frames(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();
    while let Some(end) = buffer.find("\n\n") {
        let frame: String = buffer.drain(..end + 2).collect();
        let data: Vec<&str> = frame
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|d| d.trim_start())
            .collect();
        if !data.is_empty() {
            payloads.push(data.join("\n"));
        }
    }
    payloads
}
