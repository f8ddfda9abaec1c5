// Shelfmark remote collaborators
// Trait seams for the external backend (auth provider, durable store, change
// feed) plus the shipped implementations.

pub mod auth;
pub mod local;
#[cfg(feature = "remote")]
pub mod rest;
pub mod store;

pub use auth::{AuthProvider, StaticAuth};
pub use local::LocalStore;
#[cfg(feature = "remote")]
pub use rest::RestClient;
pub use store::{BookmarkStore, ChangeFeed, StoreHandle, Subscription};
