//! The live product feed for one owner.
//!
//! [`ProductFeed::spawn`] registers an owner-filtered subscription on the
//! store and runs a task that turns every incoming snapshot into a decoded
//! [`ProductList`], published over a watch channel. Transport interruptions
//! are forwarded on a side channel; the published list is left as it was, so
//! watchers keep rendering the last known state until delivery resumes.
//!
//! The feed owns the subscription's release guard. Dropping the feed
//! deregisters the query immediately, the store closes the event stream, and
//! the task drains out on its own.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::model::{self, Product, FIELD_OWNER_ID};
use crate::store::{DocumentStore, Filter, ReleaseGuard, StoreError, StoreEvent};
use crate::sync::list::{ListPublisher, ProductList};

pub struct ProductFeed {
    list: watch::Receiver<ProductList>,
    interruptions: mpsc::UnboundedReceiver<StoreError>,
    _guard: ReleaseGuard,
    _task: JoinHandle<()>,
}

impl ProductFeed {
    /// Starts the feed for `owner`. The watch channel starts at the empty
    /// list and flips to the first snapshot as soon as the task has applied
    /// it.
    pub fn spawn(store: &dyn DocumentStore, owner: &str) -> Self {
        let subscription =
            store.subscribe(model::PRODUCTS, Filter::field_eq(FIELD_OWNER_ID, owner));
        let (events, guard) = subscription.into_parts();
        let (publisher, list) = ListPublisher::channel();
        let (interruptions_tx, interruptions) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(events, publisher, interruptions_tx, owner.to_string()));
        Self { list, interruptions, _guard: guard, _task: task }
    }

    /// A fresh watcher on the published list.
    pub fn list(&self) -> watch::Receiver<ProductList> {
        self.list.clone()
    }

    /// Waits for the next transport interruption. `None` once the feed task
    /// has stopped.
    pub async fn interrupted(&mut self) -> Option<StoreError> {
        self.interruptions.recv().await
    }

    /// Non-blocking variant of [`ProductFeed::interrupted`].
    pub fn try_interrupted(&mut self) -> Option<StoreError> {
        self.interruptions.try_recv().ok()
    }
}

async fn run(
    mut events: mpsc::UnboundedReceiver<StoreEvent>,
    publisher: ListPublisher,
    interruptions: mpsc::UnboundedSender<StoreError>,
    owner: String,
) {
    info!(%owner, "product feed started");
    while let Some(event) = events.recv().await {
        match event {
            StoreEvent::Snapshot(docs) => {
                let products: Vec<Product> = docs.iter().map(Product::from_document).collect();
                debug!(%owner, count = products.len(), "snapshot applied");
                publisher.replace_all(products);
            }
            StoreEvent::Interrupted(error) => {
                // Keep the last published list; only report the fault.
                warn!(%owner, %error, "subscription interrupted, retaining last snapshot");
                interruptions.send(error).ok();
            }
        }
    }
    info!(%owner, "product feed stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FIELD_NAME, FIELD_QUANTITY};
    use crate::store::{Document, MemoryStore};
    use std::time::Duration;
    use tokio::time::timeout;

    fn doc(owner: &str, name: &str, quantity: i64) -> Document {
        Document::new()
            .with_str(FIELD_NAME, name)
            .with_int(FIELD_QUANTITY, quantity)
            .with_str(FIELD_OWNER_ID, owner)
    }

    async fn next_list(rx: &mut watch::Receiver<ProductList>) -> ProductList {
        timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("no list update within 1s")
            .expect("feed publisher dropped");
        rx.borrow().clone()
    }

    #[tokio::test]
    async fn publishes_decoded_snapshots_for_the_owner() {
        let store = MemoryStore::new();
        store.seed(model::PRODUCTS, "p1", doc("u1", "Rice", 3));
        store.seed(model::PRODUCTS, "p2", doc("u2", "Beans", 9));

        let feed = ProductFeed::spawn(&store, "u1");
        let mut rx = feed.list();

        let list = next_list(&mut rx).await;
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].name, "Rice");
        assert_eq!(list.as_slice()[0].quantity, 3);
    }

    #[tokio::test]
    async fn each_snapshot_replaces_the_previous_list() {
        let store = MemoryStore::new();
        store.seed(model::PRODUCTS, "p1", doc("u1", "Rice", 3));

        let feed = ProductFeed::spawn(&store, "u1");
        let mut rx = feed.list();
        assert_eq!(next_list(&mut rx).await.len(), 1);

        store.seed(model::PRODUCTS, "p2", doc("u1", "Beans", 9));
        assert_eq!(next_list(&mut rx).await.len(), 2);

        store.seed_remove(model::PRODUCTS, "p1");
        let list = next_list(&mut rx).await;
        assert_eq!(list.len(), 1);
        assert!(!list.contains("p1"));
    }

    #[tokio::test]
    async fn reowned_product_leaves_the_list() {
        let store = MemoryStore::new();
        store.seed(model::PRODUCTS, "p1", doc("u1", "Rice", 3));

        let feed = ProductFeed::spawn(&store, "u1");
        let mut rx = feed.list();
        assert_eq!(next_list(&mut rx).await.len(), 1);

        store.seed(model::PRODUCTS, "p1", doc("u2", "Rice", 3));
        assert!(next_list(&mut rx).await.is_empty());
    }

    #[tokio::test]
    async fn interruption_keeps_the_last_list_and_is_reported() {
        let store = MemoryStore::new();
        store.seed(model::PRODUCTS, "p1", doc("u1", "Rice", 3));

        let mut feed = ProductFeed::spawn(&store, "u1");
        let mut rx = feed.list();
        assert_eq!(next_list(&mut rx).await.len(), 1);

        store.interrupt(model::PRODUCTS, StoreError::Unavailable("blip".into()));
        let error = timeout(Duration::from_secs(1), feed.interrupted())
            .await
            .expect("no interruption within 1s")
            .expect("feed task stopped");
        assert_eq!(error, StoreError::Unavailable("blip".into()));

        // The stale list is still being served.
        assert_eq!(rx.borrow().len(), 1);

        // Delivery resumes on the next remote change.
        store.seed(model::PRODUCTS, "p2", doc("u1", "Beans", 9));
        assert_eq!(next_list(&mut rx).await.len(), 2);
    }

    #[tokio::test]
    async fn dropping_the_feed_releases_the_subscription() {
        let store = MemoryStore::new();
        let feed = ProductFeed::spawn(&store, "u1");
        assert_eq!(store.subscriber_count(), 1);
        drop(feed);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn malformed_documents_decode_with_defaults() {
        let store = MemoryStore::new();
        store.seed(
            model::PRODUCTS,
            "p1",
            Document::new()
                .with_str(FIELD_QUANTITY, "not a number")
                .with_str(FIELD_OWNER_ID, "u1"),
        );

        let feed = ProductFeed::spawn(&store, "u1");
        let mut rx = feed.list();
        let list = next_list(&mut rx).await;
        assert_eq!(list.as_slice()[0], Product::new("p1", "", 0, ""));
    }
}
