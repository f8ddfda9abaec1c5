//! Unit tests for the Shelfmark database layer (connection + migrations).

use shelfmark::database::{migrations, Database};

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_tables = ["bookmarks", "schema_version"];

    for table in &expected_tables {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Table '{}' should exist after migrations", table);
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let expected_indexes = ["idx_bookmarks_owner", "idx_bookmarks_created_at"];

    for index in &expected_indexes {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                [index],
                |row| row.get(0),
            )
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[test]
fn test_schema_version_recorded() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();
    assert_eq!(
        migrations::get_schema_version(&conn),
        migrations::CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();
    // Running migrations again must not fail or re-apply anything.
    migrations::run_all(&conn).expect("second run_all should succeed");
    assert_eq!(
        migrations::get_schema_version(&conn),
        migrations::CURRENT_SCHEMA_VERSION
    );
}

#[test]
fn test_open_persistent_database() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let path = dir.path().join("shelfmark.db");

    {
        let db = Database::open(&path).expect("open failed");
        db.connection()
            .execute(
                "INSERT INTO bookmarks (id, owner, url, title, created_at) \
                 VALUES ('b1', 'u1', 'https://example.com', 'Example', 1)",
                [],
            )
            .expect("insert failed");
    }

    // Reopen and verify the row survived.
    let db = Database::open(&path).expect("reopen failed");
    let count: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))
        .expect("count failed");
    assert_eq!(count, 1);
}
