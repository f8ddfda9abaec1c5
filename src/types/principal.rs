use serde::{Deserialize, Serialize};

/// The authenticated user identity associated with a session.
///
/// `id` is the stable identifier recorded as `owner` on inserted bookmarks.
/// The profile fields are presentation-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Principal {
    /// A principal with no profile fields, just an identifier.
    pub fn with_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: None,
            email: None,
            avatar_url: None,
        }
    }
}
