#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Stockroom
//!
//! > **The headless core of a small inventory app.**
//!
//! This crate implements the two screens of a product-inventory client —
//! the per-user product listing with its edit dialog, and user registration
//! — without any rendering. State lives here; a UI layer only reads it and
//! forwards user intents.
//!
//! ## How Data Flows
//!
//! The remote side is a schemaless document store plus an identity
//! provider, both behind capability traits ([`store::DocumentStore`],
//! [`auth::AuthGateway`]). The listing is driven by a live, owner-filtered
//! subscription:
//!
//! - every subscription event carries the **complete** result set, and the
//!   local list is replaced wholesale on each one
//! - mutations (save, delete) go to the store and report back
//!   asynchronously; nothing is applied locally until the next snapshot
//!   confirms it
//! - transport interruptions keep the last list on screen and surface as a
//!   notice; the subscription itself stays registered
//!
//! An open edit dialog works on a copy of its product, so remote updates
//! can never overwrite text mid-typing.
//!
//! ## Module Tour
//!
//! - [`store`]: the document-store capability, the schemaless [`store::Document`]
//!   model with its defaulting accessors, and [`store::MemoryStore`] for tests
//! - [`auth`]: the identity capability and [`auth::MemoryAuth`]
//! - [`model`]: [`model::Product`] and [`model::UserProfile`] with their
//!   wire mappings
//! - [`sync`]: the owner-scoped [`sync::ProductFeed`] publishing
//!   [`sync::ProductList`] versions over a watch channel
//! - [`screen`]: [`screen::ProductScreen`] and [`screen::RegisterScreen`],
//!   the state a renderer binds to
//! - [`lifecycle`]: [`lifecycle::InventorySystem`] wiring plus tracing setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use stockroom::auth::MemoryAuth;
//! use stockroom::lifecycle::InventorySystem;
//! use stockroom::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let auth = Arc::new(MemoryAuth::new());
//!     let store = Arc::new(MemoryStore::new());
//!     let system = InventorySystem::new(auth, store);
//!
//!     let mut register = system.register_screen();
//!     register.form.username = "alice".into();
//!     register.form.email = "alice@example.com".into();
//!     register.form.password = "hunter22".into();
//!     register.form.confirm_password = "hunter22".into();
//!     register.submit();
//!     register.tick().await;
//!
//!     let mut products = system.products_screen().expect("signed in");
//!     products.tick().await; // first snapshot
//!     println!("{} products", products.products().len());
//! }
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod auth;
pub mod lifecycle;
pub mod model;
pub mod screen;
pub mod store;
pub mod sync;
