//! Shelfmark — a realtime bookmark collection client.
//!
//! Entry point: runs a console walkthrough of the client flows against the
//! embedded local store — snapshot + live sync, submission, an out-of-band
//! update, and the two-phase deletion flow.

use std::sync::Arc;
use std::time::Duration;

use shelfmark::app::App;
use shelfmark::remote::auth::StaticAuth;
use shelfmark::remote::local::LocalStore;
use shelfmark::database::Database;
use shelfmark::types::bookmark::Category;
use shelfmark::types::principal::Principal;

/// Waits until the mirror has gone quiet: no revision bump for 100ms.
/// Bounded per wait, so a stalled stream cannot hang the demo.
async fn settle(app: &App) {
    let mut changes = app.synchronizer.subscribe_changes();
    while let Ok(Ok(())) =
        tokio::time::timeout(Duration::from_millis(100), changes.changed()).await
    {}
}

fn print_collection(app: &App) {
    let bookmarks = app.bookmarks();
    println!("  Collection ({} items):", bookmarks.len());
    for b in &bookmarks {
        println!(
            "    [{}] {} — {} {}",
            b.category,
            b.title,
            b.url,
            if b.tags.is_empty() {
                String::new()
            } else {
                format!("({})", b.tags.join(", "))
            }
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("Shelfmark v{} — demo mode", env!("CARGO_PKG_VERSION"));
    println!();

    let db = Arc::new(Database::open_in_memory()?);
    let store = Arc::new(LocalStore::new(db));
    let auth = Arc::new(StaticAuth::signed_in(Principal {
        id: "demo-user".to_string(),
        display_name: Some("Demo User".to_string()),
        email: Some("demo@example.com".to_string()),
        avatar_url: None,
    }));

    let mut app = App::new(auth, store.clone());
    let principal = app.activate().await?;
    println!("Signed in as {} ({})", principal.display_name.as_deref().unwrap_or("?"), principal.id);
    print_collection(&app);
    println!();

    // Submit two bookmarks; the second has no title, so the hostname is used.
    println!("Adding bookmarks...");
    app.submission.form.url = "https://docs.rs/tokio".to_string();
    app.submission.form.title = "Tokio docs".to_string();
    app.submission.form.category = Category::Development;
    app.submission.form.tags = " rust, async ,, runtime ".to_string();
    app.submit_bookmark().await?;

    app.submission.form.url = "https://crates.io".to_string();
    app.submit_bookmark().await?;
    settle(&app).await;
    print_collection(&app);
    println!();

    // Simulate an out-of-band edit arriving through the stream.
    println!("Applying an external edit...");
    if let Some(mut edited) = app.bookmarks().pop() {
        edited.is_favorite = true;
        edited.title = format!("{} *", edited.title);
        store.apply_update(&edited)?;
    }
    settle(&app).await;
    print_collection(&app);
    println!();

    // Two-phase deletion: mark, cancel, mark again, confirm.
    println!("Deleting the newest bookmark...");
    if let Some(first) = app.bookmarks().first().cloned() {
        app.deletion.request(&first.id);
        app.deletion.cancel(); // change of heart, no store call
        app.deletion.request(&first.id);
        app.confirm_delete().await?;
    }
    settle(&app).await;
    print_collection(&app);

    app.deactivate();
    println!();
    println!("Done.");
    Ok(())
}
