//! # Observability & Tracing
//!
//! This module initializes structured logging for the whole crate.
//!
//! ## Overview
//!
//! [`setup_tracing`] installs a `tracing` subscriber with a compact format
//! that hides crate/module prefixes (`with_target(false)`); the structured
//! fields on each line already say which part of the system is talking.
//!
//! - **Structured logging** with the `tracing` crate
//! - **Spans** around command dispatch and the registration flow
//! - **Configurable log levels** via the `RUST_LOG` environment variable
//!
//! ## What Gets Traced
//!
//! - **Feed lifecycle**: subscription registered, snapshots applied,
//!   interruptions, release
//! - **Commands**: save and delete dispatch, and how each one finished
//! - **Registration**: credential creation, display name, profile write
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Show full drafts and documents at dispatch points
//! RUST_LOG=debug cargo run
//!
//! # Filter to one module
//! RUST_LOG=stockroom::sync=debug cargo run
//! ```
//!
//! ## Trace Example
//!
//! With `RUST_LOG=debug`, a save from the listing screen reads:
//!
//! ```text
//! DEBUG save{target=None}: dispatching save draft=ProductDraft { name: "Rice", quantity: Some(12), description: "" }
//! INFO product saved id="products_1"
//! DEBUG snapshot applied owner="user_1" count=1
//! DEBUG save confirmed, closing session id="products_1"
//! ```
//!
//! The `?draft` / `%id` syntax records variables as structured fields using
//! their `Debug` / `Display` representations.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Structured fields carry the context instead
        .compact()
        .init();
}
