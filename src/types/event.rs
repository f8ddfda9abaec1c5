use serde::{Deserialize, Serialize};

use crate::types::bookmark::BookmarkRecord;

/// Kind of change delivered by the stream.
///
/// `Unknown` absorbs event kinds introduced by newer backends; the
/// synchronizer ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    #[serde(other)]
    Unknown,
}

/// A single change-stream notification for the bookmark collection.
///
/// Delete events carry the removed record; only its `id` is consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub record: BookmarkRecord,
}

impl ChangeEvent {
    pub fn insert(record: BookmarkRecord) -> Self {
        Self { kind: ChangeKind::Insert, record }
    }

    pub fn update(record: BookmarkRecord) -> Self {
        Self { kind: ChangeKind::Update, record }
    }

    pub fn delete(record: BookmarkRecord) -> Self {
        Self { kind: ChangeKind::Delete, record }
    }
}
