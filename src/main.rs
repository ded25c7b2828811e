//! # Stockroom Demo
//!
//! Walks both screens end to end against the in-memory capabilities:
//!
//! 1. Register a user (which signs them in).
//! 2. Open the products screen and wait for the first snapshot.
//! 3. Create a product through the edit session, then change its quantity,
//!    then delete it — each time waiting for the store's snapshot to come
//!    back rather than touching the list directly.
//!
//! Run with `RUST_LOG=info cargo run` (or `debug` for drafts and documents).

use std::sync::Arc;

use stockroom::auth::MemoryAuth;
use stockroom::lifecycle::{setup_tracing, InventorySystem};
use stockroom::store::MemoryStore;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting stockroom demo");

    let auth = Arc::new(MemoryAuth::new());
    let store = Arc::new(MemoryStore::new());
    let system = InventorySystem::new(auth, Arc::<MemoryStore>::clone(&store));

    // Register a user; success signs them in.
    let span = tracing::info_span!("registration");
    let user_id = async {
        let mut register = system.register_screen();
        register.form.username = "alice".to_string();
        register.form.email = "alice@example.com".to_string();
        register.form.password = "correct-horse".to_string();
        register.form.confirm_password = "correct-horse".to_string();

        info!("Submitting registration form");
        register.submit();
        register.tick().await;

        for notice in register.take_notices() {
            warn!(%notice, "registration notice");
        }
        register.registered().map(str::to_owned).ok_or("registration did not complete")
    }
    .instrument(span)
    .await?;

    info!(%user_id, "User registered and signed in");

    let mut screen = system.products_screen().map_err(|e| e.to_string())?;
    screen.tick().await;
    info!(count = screen.products().len(), "Products screen open");

    // Create a product through the edit session.
    let span = tracing::info_span!("create_product");
    let product_id = async {
        screen.begin_create();
        screen.session_mut().name = "Rice".to_string();
        screen.session_mut().quantity = "10".to_string();
        screen.session_mut().description = "long grain".to_string();
        screen.save();

        // The session closes on the outcome; the list fills on the snapshot.
        while screen.session().is_open() || screen.products().is_empty() {
            screen.tick().await;
        }
        let product = screen.products().as_slice()[0].clone();
        info!(id = %product.id, name = %product.name, quantity = product.quantity, "Product created");
        Ok::<_, String>(product.id)
    }
    .instrument(span)
    .await?;

    // Edit its quantity.
    let span = tracing::info_span!("edit_product");
    async {
        if !screen.begin_edit(&product_id) {
            return Err("product disappeared from the list".to_string());
        }
        screen.session_mut().quantity = "7".to_string();
        screen.save();

        while screen.session().is_open()
            || screen.products().get(&product_id).map(|p| p.quantity) != Some(7)
        {
            screen.tick().await;
        }
        info!(id = %product_id, "Quantity updated");
        Ok(())
    }
    .instrument(span)
    .await?;

    // Delete it and wait for the listing to empty out.
    let span = tracing::info_span!("delete_product");
    async {
        screen.delete(&product_id);
        while !screen.products().is_empty() {
            screen.tick().await;
        }
        info!(id = %product_id, "Product deleted");
    }
    .instrument(span)
    .await;

    for notice in screen.take_notices() {
        warn!(%notice, "screen notice");
    }

    // Dropping the screen releases its subscription on the spot.
    drop(screen);
    info!(subscribers = store.subscriber_count(), "Demo finished");
    Ok(())
}
