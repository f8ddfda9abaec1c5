use serde::{Deserialize, Serialize};
use url::Url;

/// Title assigned when the form omits one and the URL cannot be parsed.
pub const FALLBACK_TITLE: &str = "New Bookmark";

/// Closed set of bookmark categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Category {
    Work,
    Design,
    Development,
    Planning,
    Personal,
    #[default]
    Uncategorized,
}

impl Category {
    /// All categories, in the order they are presented to the user.
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Design,
        Category::Development,
        Category::Planning,
        Category::Personal,
        Category::Uncategorized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Design => "Design",
            Category::Development => "Development",
            Category::Planning => "Planning",
            Category::Personal => "Personal",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Parses a category name. Unknown names map to `Uncategorized`.
    pub fn parse(name: &str) -> Category {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookmark as stored by the remote collection.
///
/// `id`, `created_at`, and `owner` are assigned by the store at insert time
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub id: String,
    pub owner: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: i64,
}

/// An assembled record ready for insertion — everything the store does not
/// assign itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    pub owner: String,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub is_favorite: bool,
}

/// Raw form input for the submission flow. All fields are free text exactly
/// as typed; only `url` is required.
#[derive(Debug, Clone, Default)]
pub struct BookmarkForm {
    pub url: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub tags: String,
}

impl BookmarkForm {
    /// Effective title: the typed title, or the URL's hostname when the title
    /// is empty, or [`FALLBACK_TITLE`] when the URL does not parse.
    pub fn effective_title(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        match Url::parse(&self.url).ok().and_then(|u| {
            u.host_str().map(|h| h.to_string())
        }) {
            Some(host) => host,
            None => FALLBACK_TITLE.to_string(),
        }
    }

    /// Parses the comma-separated tag input: split on commas, trim
    /// whitespace, drop empty entries. Order is preserved and duplicates are
    /// kept.
    pub fn parsed_tags(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }

    /// Assembles the insert payload for the given owner.
    pub fn assemble(&self, owner: &str) -> BookmarkDraft {
        BookmarkDraft {
            owner: owner.to_string(),
            url: self.url.clone(),
            title: self.effective_title(),
            description: if self.description.is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
            category: self.category,
            tags: self.parsed_tags(),
            is_favorite: false,
        }
    }

    /// Resets every field to its default.
    pub fn clear(&mut self) {
        *self = BookmarkForm::default();
    }
}
