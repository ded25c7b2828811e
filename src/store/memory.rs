//! In-memory [`DocumentStore`] for tests and the demo binary.
//!
//! Behaves like the real capability as the rest of the crate observes it:
//! subscriptions receive an initial snapshot immediately and a fresh complete
//! snapshot after every mutation of their collection, filtered per
//! registration. On top of that it offers the handles a test needs:
//!
//! - [`MemoryStore::fail_next`] queues an error for the next mutation of a
//!   given kind, which then leaves the data untouched
//! - [`MemoryStore::interrupt`] injects a transport fault into live
//!   subscriptions without unregistering them
//! - [`MemoryStore::seed`] writes as if another client did, bypassing the
//!   failure queues and the operation counters
//! - [`MemoryStore::counts`] / [`MemoryStore::subscriber_count`] observe what
//!   the code under test actually asked the store to do

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::store::document::{Document, DocumentId, StoredDocument};
use crate::store::remote::{DocumentStore, Filter, StoreError, StoreEvent, Subscription};

/// Kind of mutation, used to address the failure queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Create,
    Replace,
    Delete,
}

/// How many mutations of each kind the store has been asked to perform,
/// including ones that failed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpCounts {
    pub creates: usize,
    pub replaces: usize,
    pub deletes: usize,
}

struct Subscriber {
    id: u64,
    collection: String,
    filter: Filter,
    events: mpsc::UnboundedSender<StoreEvent>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<StoredDocument>>,
    subscribers: Vec<Subscriber>,
    failures: HashMap<Mutation, VecDeque<StoreError>>,
    counts: OpCounts,
    next_doc: u64,
    next_subscriber: u64,
}

impl Inner {
    fn take_failure(&mut self, op: Mutation) -> Option<StoreError> {
        self.failures.get_mut(&op).and_then(VecDeque::pop_front)
    }

    fn next_doc_id(&mut self, collection: &str) -> DocumentId {
        self.next_doc += 1;
        format!("{}_{}", collection, self.next_doc)
    }

    fn collection_mut(&mut self, collection: &str) -> &mut Vec<StoredDocument> {
        self.collections.entry(collection.to_string()).or_default()
    }

    fn snapshot_for(&self, collection: &str, filter: &Filter) -> Vec<StoredDocument> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter().filter(|doc| filter.matches(&doc.fields)).cloned().collect()
            })
            .unwrap_or_default()
    }

    /// Sends each live subscriber of `collection` its complete filtered
    /// result set. Subscribers whose receiver is gone are pruned.
    fn fan_out(&mut self, collection: &str) {
        let docs = self.collections.get(collection).cloned().unwrap_or_default();
        self.subscribers.retain(|sub| {
            if sub.collection != collection {
                return true;
            }
            let matching: Vec<StoredDocument> =
                docs.iter().filter(|doc| sub.filter.matches(&doc.fields)).cloned().collect();
            sub.events.send(StoreEvent::Snapshot(matching)).is_ok()
        });
    }

    fn upsert(&mut self, collection: &str, id: &str, fields: Document) {
        let docs = self.collection_mut(collection);
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(existing) => existing.fields = fields,
            None => docs.push(StoredDocument::new(id, fields)),
        }
    }
}

/// In-memory document store. Cheap to clone through [`Arc`]; all handles see
/// the same data.
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Inner::default())) }
    }

    /// Queues `error` for the next mutation of kind `op`. Queued failures are
    /// consumed in order, one per call.
    pub fn fail_next(&self, op: Mutation, error: StoreError) {
        let mut inner = self.inner.lock().unwrap();
        inner.failures.entry(op).or_default().push_back(error);
    }

    /// Injects a transport fault into every live subscription of
    /// `collection`. Registrations survive; only an event is delivered.
    pub fn interrupt(&self, collection: &str, error: StoreError) {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.retain(|sub| {
            if sub.collection != collection {
                return true;
            }
            sub.events.send(StoreEvent::Interrupted(error.clone())).is_ok()
        });
    }

    /// Writes a document as another client would: subscribers are notified,
    /// but the failure queues and operation counters are not involved.
    pub fn seed(&self, collection: &str, id: &str, fields: Document) {
        let mut inner = self.inner.lock().unwrap();
        inner.upsert(collection, id, fields);
        inner.fan_out(collection);
    }

    /// Removes a document as another client would.
    pub fn seed_remove(&self, collection: &str, id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.collection_mut(collection).retain(|doc| doc.id != id);
        inner.fan_out(collection);
    }

    pub fn counts(&self) -> OpCounts {
        self.inner.lock().unwrap().counts
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }

    /// Current contents of a collection, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        self.inner.lock().unwrap().collections.get(collection).cloned().unwrap_or_default()
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<StoredDocument> {
        self.inner
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn subscribe(&self, collection: &str, filter: Filter) -> Subscription {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let id = {
            let mut inner = self.inner.lock().unwrap();
            inner.next_subscriber += 1;
            let id = inner.next_subscriber;

            // Initial delivery: the current result set is queued before the
            // subscriber is first polled.
            let snapshot = inner.snapshot_for(collection, &filter);
            events_tx.send(StoreEvent::Snapshot(snapshot)).ok();

            inner.subscribers.push(Subscriber {
                id,
                collection: collection.to_string(),
                filter,
                events: events_tx,
            });
            id
        };
        debug!(collection, subscriber = id, "subscription registered");

        let registry = Arc::clone(&self.inner);
        Subscription::new(events_rx, move || {
            registry.lock().unwrap().subscribers.retain(|sub| sub.id != id);
            debug!(subscriber = id, "subscription released");
        })
    }

    async fn create(&self, collection: &str, fields: Document) -> Result<DocumentId, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.creates += 1;
        if let Some(error) = inner.take_failure(Mutation::Create) {
            return Err(error);
        }
        let id = inner.next_doc_id(collection);
        inner.collection_mut(collection).push(StoredDocument::new(id.clone(), fields));
        inner.fan_out(collection);
        Ok(id)
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.replaces += 1;
        if let Some(error) = inner.take_failure(Mutation::Replace) {
            return Err(error);
        }
        inner.upsert(collection, id, fields);
        inner.fan_out(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.deletes += 1;
        if let Some(error) = inner.take_failure(Mutation::Delete) {
            return Err(error);
        }
        inner.collection_mut(collection).retain(|doc| doc.id != id);
        inner.fan_out(collection);
        Ok(())
    }
}
