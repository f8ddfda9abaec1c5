use std::fmt;

// === AuthError ===

/// Errors related to the authentication provider.
#[derive(Debug)]
pub enum AuthError {
    /// No principal is resolvable for the current session.
    NotAuthenticated,
    /// The provider rejected or failed the request.
    ProviderError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::ProviderError(msg) => write!(f, "Auth provider error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

// === StoreError ===

/// Errors related to durable-store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The remote operation failed (network or backend rejection).
    Remote(String),
    /// The embedded database failed.
    Database(String),
    /// A record or payload could not be serialized or deserialized.
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Remote(msg) => write!(f, "Remote store error: {}", msg),
            StoreError::Database(msg) => write!(f, "Store database error: {}", msg),
            StoreError::Serialization(msg) => {
                write!(f, "Store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === SubmitError ===

/// Errors related to the bookmark submission flow.
#[derive(Debug)]
pub enum SubmitError {
    /// The required `url` field is empty. No network call was made.
    MissingUrl,
    /// No principal at write time. The write was aborted.
    NotAuthenticated,
    /// The principal lookup itself failed.
    AuthFailed(String),
    /// The insert against the remote store failed.
    StoreFailed(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::MissingUrl => write!(f, "URL is required"),
            SubmitError::NotAuthenticated => write!(f, "Not authenticated"),
            SubmitError::AuthFailed(msg) => write!(f, "Principal lookup failed: {}", msg),
            SubmitError::StoreFailed(msg) => write!(f, "Bookmark insert failed: {}", msg),
        }
    }
}

impl std::error::Error for SubmitError {}

// === SyncError ===

/// Errors related to the collection synchronizer.
#[derive(Debug)]
pub enum SyncError {
    /// Opening the change-stream subscription failed.
    SubscribeFailed(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::SubscribeFailed(msg) => {
                write!(f, "Change stream subscription failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for SyncError {}

// === ConfigError ===

/// Errors related to loading application configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    IoError(String),
    /// The config file could not be parsed.
    ParseError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
