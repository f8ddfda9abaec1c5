//! Property-based tests for the Collection Synchronizer reducer.
//!
//! For any snapshot and any sequence of stream events, the identifier set of
//! the local collection must equal the set obtained by folding the events
//! over the snapshot: insert adds, update preserves membership, delete
//! removes, and unknown kinds change nothing.

use std::collections::HashSet;

use proptest::prelude::*;

use shelfmark::managers::collection_sync::apply_event;
use shelfmark::types::bookmark::{BookmarkRecord, Category};
use shelfmark::types::event::{ChangeEvent, ChangeKind};

fn record(id: u8) -> BookmarkRecord {
    BookmarkRecord {
        id: format!("bm-{}", id),
        owner: "alice".to_string(),
        url: format!("https://example.com/{}", id),
        title: format!("Bookmark {}", id),
        description: None,
        category: Category::Uncategorized,
        tags: Vec::new(),
        is_favorite: false,
        created_at: id as i64,
    }
}

/// One stream event: a kind selector and a small id space so collisions
/// (duplicate inserts, deletes of absent ids) actually occur.
fn arb_op() -> impl Strategy<Value = (u8, u8)> {
    (0..4u8, 0..8u8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn membership_equals_folded_model(
        initial in proptest::collection::hash_set(0..8u8, 0..5),
        ops in proptest::collection::vec(arb_op(), 0..40),
    ) {
        let mut bookmarks: Vec<BookmarkRecord> = initial.iter().map(|&id| record(id)).collect();
        let mut model: HashSet<String> = initial.iter().map(|&id| format!("bm-{}", id)).collect();

        for (kind, id) in ops {
            let rec = record(id);
            match kind {
                0 => {
                    model.insert(rec.id.clone());
                    apply_event(&mut bookmarks, ChangeEvent::insert(rec));
                }
                1 => {
                    // Update never changes membership, present or not.
                    apply_event(&mut bookmarks, ChangeEvent::update(rec));
                }
                2 => {
                    model.remove(&rec.id);
                    apply_event(&mut bookmarks, ChangeEvent::delete(rec));
                }
                _ => {
                    apply_event(&mut bookmarks, ChangeEvent { kind: ChangeKind::Unknown, record: rec });
                }
            }
        }

        let present: HashSet<String> = bookmarks.iter().map(|b| b.id.clone()).collect();
        prop_assert_eq!(
            present,
            model,
            "collection membership must match the folded event sequence"
        );
    }

    #[test]
    fn insert_always_lands_at_the_front(
        initial in proptest::collection::vec(0..8u8, 0..6),
        id in 0..8u8,
    ) {
        let mut bookmarks: Vec<BookmarkRecord> = initial.iter().map(|&i| record(i)).collect();
        let inserted = record(id);
        let inserted_id = inserted.id.clone();

        apply_event(&mut bookmarks, ChangeEvent::insert(inserted));

        prop_assert_eq!(&bookmarks[0].id, &inserted_id);
    }

    #[test]
    fn update_preserves_ordering(
        initial in proptest::collection::hash_set(0..8u8, 1..6),
        id in 0..8u8,
    ) {
        let mut bookmarks: Vec<BookmarkRecord> = initial.iter().map(|&i| record(i)).collect();
        let order_before: Vec<String> = bookmarks.iter().map(|b| b.id.clone()).collect();

        let mut edited = record(id);
        edited.title = "Edited".to_string();
        apply_event(&mut bookmarks, ChangeEvent::update(edited));

        let order_after: Vec<String> = bookmarks.iter().map(|b| b.id.clone()).collect();
        prop_assert_eq!(order_before, order_after, "update must replace in place");
    }
}
