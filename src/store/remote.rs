//! The remote document store capability.
//!
//! [`DocumentStore`] is the only surface the rest of the crate talks to when
//! it needs remote data. It is deliberately small:
//!
//! - `subscribe` registers a live query and returns a [`Subscription`] that
//!   delivers complete [`StoreEvent::Snapshot`]s, never deltas
//! - `create`, `replace` and `delete` are one-shot mutations
//!
//! A subscription outlives transport trouble. When the backing connection
//! hiccups the store emits [`StoreEvent::Interrupted`] and keeps the
//! registration alive, so consumers keep their last snapshot and wait for the
//! next one. The registration ends only when the [`Subscription`] (or the
//! [`ReleaseGuard`] split out of it) is dropped.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::store::document::{Document, DocumentId, StoredDocument};

// ============================================================================
// Errors
// ============================================================================

/// Failure reported by the remote store for a mutation, or carried by an
/// [`StoreEvent::Interrupted`] event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The store could not be reached or the request timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the request for the signed-in identity.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

// ============================================================================
// Queries
// ============================================================================

/// A single field-equality constraint on a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    field: String,
    equals: Value,
}

impl Filter {
    pub fn field_eq(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self { field: field.into(), equals: equals.into() }
    }

    /// Whether a document's fields satisfy the constraint. A document without
    /// the field never matches.
    pub fn matches(&self, fields: &Document) -> bool {
        fields.get(&self.field) == Some(&self.equals)
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

// ============================================================================
// Subscription events
// ============================================================================

/// What a live query delivers.
#[derive(Debug)]
pub enum StoreEvent {
    /// The complete current result set of the subscribed query. Every event
    /// replaces the previous one wholesale; there is no delta encoding.
    Snapshot(Vec<StoredDocument>),

    /// A transport-level fault. The subscription stays registered and a later
    /// `Snapshot` resumes normal delivery.
    Interrupted(StoreError),
}

/// Runs a release action exactly once, either explicitly via
/// [`ReleaseGuard::release`] or when the guard is dropped.
pub struct ReleaseGuard(Option<Box<dyn FnOnce() + Send>>);

impl ReleaseGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(release)))
    }

    /// Consumes the guard, running the release action now.
    pub fn release(self) {}
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if let Some(release) = self.0.take() {
            release();
        }
    }
}

/// A registered live query: a stream of [`StoreEvent`]s plus the guard that
/// deregisters the query.
///
/// The first `Snapshot` is queued at registration time, so a consumer that
/// awaits [`Subscription::next`] right away sees the current result set
/// without waiting for a remote change.
pub struct Subscription {
    events: mpsc::UnboundedReceiver<StoreEvent>,
    guard: ReleaseGuard,
}

impl Subscription {
    pub fn new(
        events: mpsc::UnboundedReceiver<StoreEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self { events, guard: ReleaseGuard::new(release) }
    }

    /// Next event, or `None` once the store has torn the stream down.
    pub async fn next(&mut self) -> Option<StoreEvent> {
        self.events.recv().await
    }

    /// Splits the event stream from the release guard so they can live in
    /// different places. The registration then lasts as long as the guard.
    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<StoreEvent>, ReleaseGuard) {
        (self.events, self.guard)
    }
}

// ============================================================================
// The capability
// ============================================================================

/// Remote schemaless document store, keyed as collection / document id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Registers a live query over one collection. Infallible: transport
    /// trouble surfaces later as [`StoreEvent::Interrupted`] on the stream.
    fn subscribe(&self, collection: &str, filter: Filter) -> Subscription;

    /// Stores a new document under a store-assigned id and returns that id.
    async fn create(&self, collection: &str, fields: Document) -> Result<DocumentId, StoreError>;

    /// Writes the full document under the given id, replacing whatever was
    /// there. Writing to an id that does not exist creates it.
    async fn replace(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError>;

    /// Removes the document. Deleting an id that does not exist is not an
    /// error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
