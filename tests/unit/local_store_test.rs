//! Unit tests for the embedded `LocalStore` implementation of the store and
//! change-feed seams: owner scoping, snapshot ordering, and event emission.

use std::sync::Arc;
use std::time::Duration;

use shelfmark::database::Database;
use shelfmark::remote::store::{BookmarkStore, ChangeFeed, Subscription};
use shelfmark::remote::LocalStore;
use shelfmark::types::bookmark::{BookmarkDraft, Category};
use shelfmark::types::event::ChangeKind;

fn setup() -> (Arc<Database>, LocalStore) {
    let db = Arc::new(Database::open_in_memory().expect("open_in_memory failed"));
    let store = LocalStore::new(db.clone());
    (db, store)
}

fn draft(owner: &str, url: &str) -> BookmarkDraft {
    BookmarkDraft {
        owner: owner.to_string(),
        url: url.to_string(),
        title: "Title".to_string(),
        description: None,
        category: Category::Uncategorized,
        tags: Vec::new(),
        is_favorite: false,
    }
}

async fn recv(sub: &mut Subscription) -> shelfmark::types::event::ChangeEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.next_event())
        .await
        .expect("timed out waiting for change event")
        .expect("change feed ended unexpectedly")
}

#[tokio::test]
async fn insert_assigns_id_and_timestamp() {
    let (_db, store) = setup();
    let record = store.insert(draft("alice", "https://example.com")).await.unwrap();

    assert!(!record.id.is_empty());
    assert!(record.created_at > 0);
    assert_eq!(record.owner, "alice");
    assert!(!record.is_favorite);
}

#[tokio::test]
async fn list_is_owner_scoped() {
    let (_db, store) = setup();
    store.insert(draft("alice", "https://a.example")).await.unwrap();
    store.insert(draft("bob", "https://b.example")).await.unwrap();

    let alices = store.list_for_owner("alice").await.unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].url, "https://a.example");

    let carols = store.list_for_owner("carol").await.unwrap();
    assert!(carols.is_empty());
}

#[tokio::test]
async fn list_orders_by_creation_time_descending() {
    let (db, store) = setup();
    let older = store.insert(draft("alice", "https://old.example")).await.unwrap();
    let newer = store.insert(draft("alice", "https://new.example")).await.unwrap();

    // Both inserts can land in the same second; give them distinct times.
    db.connection()
        .execute(
            "UPDATE bookmarks SET created_at = created_at - 100 WHERE id = ?1",
            [&older.id],
        )
        .unwrap();

    let listed = store.list_for_owner("alice").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);
}

#[tokio::test]
async fn insert_and_delete_emit_events() {
    let (_db, store) = setup();
    let mut sub = store.subscribe("alice").await.unwrap();

    let record = store.insert(draft("alice", "https://example.com")).await.unwrap();
    let event = recv(&mut sub).await;
    assert_eq!(event.kind, ChangeKind::Insert);
    assert_eq!(event.record, record);

    store.delete(&record.id).await.unwrap();
    let event = recv(&mut sub).await;
    assert_eq!(event.kind, ChangeKind::Delete);
    assert_eq!(event.record.id, record.id);
}

#[tokio::test]
async fn delete_of_absent_id_is_a_silent_noop() {
    let (_db, store) = setup();
    let mut sub = store.subscribe("alice").await.unwrap();

    store.delete("no-such-id").await.unwrap();

    // The next observed event is a real insert — the absent delete emitted
    // nothing ahead of it.
    let record = store.insert(draft("alice", "https://example.com")).await.unwrap();
    let event = recv(&mut sub).await;
    assert_eq!(event.kind, ChangeKind::Insert);
    assert_eq!(event.record.id, record.id);
}

#[tokio::test]
async fn subscription_is_owner_scoped() {
    let (_db, store) = setup();
    let mut sub = store.subscribe("alice").await.unwrap();

    store.insert(draft("bob", "https://b.example")).await.unwrap();
    let record = store.insert(draft("alice", "https://a.example")).await.unwrap();

    // Bob's insert is filtered out; Alice's arrives first.
    let event = recv(&mut sub).await;
    assert_eq!(event.record.id, record.id);
}

#[tokio::test]
async fn apply_update_persists_and_emits() {
    let (_db, store) = setup();
    let mut record = store.insert(draft("alice", "https://example.com")).await.unwrap();
    let mut sub = store.subscribe("alice").await.unwrap();

    record.title = "Renamed".to_string();
    record.is_favorite = true;
    store.apply_update(&record).unwrap();

    let event = recv(&mut sub).await;
    assert_eq!(event.kind, ChangeKind::Update);
    assert_eq!(event.record.title, "Renamed");
    assert!(event.record.is_favorite);

    let listed = store.list_for_owner("alice").await.unwrap();
    assert_eq!(listed[0].title, "Renamed");
    assert!(listed[0].is_favorite);
}

#[tokio::test]
async fn tags_and_category_round_trip_through_storage() {
    let (_db, store) = setup();
    let mut d = draft("alice", "https://example.com");
    d.category = Category::Design;
    d.tags = vec!["ui".to_string(), "ui".to_string(), "tools".to_string()];
    d.description = Some("reference".to_string());

    let record = store.insert(d).await.unwrap();
    let listed = store.list_for_owner("alice").await.unwrap();
    assert_eq!(listed[0], record);
    assert_eq!(listed[0].category, Category::Design);
    // Duplicates are preserved, not deduplicated.
    assert_eq!(listed[0].tags, vec!["ui", "ui", "tools"]);
    assert_eq!(listed[0].description.as_deref(), Some("reference"));
}
