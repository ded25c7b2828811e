//! Ordered, identity-keyed product state and its publication channel.

use tokio::sync::watch;

use crate::model::Product;

/// The products visible to one owner, in the order the last snapshot
/// delivered them. Value type: consumers get their own copy and read it
/// without locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductList {
    items: Vec<Product>,
}

impl ProductList {
    pub fn new(items: Vec<Product>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.items
    }

    /// Looks a product up by document id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.items.iter().find(|product| product.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

impl<'a> IntoIterator for &'a ProductList {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Publishes successive versions of the list to any number of watchers.
pub struct ListPublisher {
    tx: watch::Sender<ProductList>,
}

impl ListPublisher {
    /// New publisher, starting from the empty list.
    pub fn channel() -> (Self, watch::Receiver<ProductList>) {
        let (tx, rx) = watch::channel(ProductList::default());
        (Self { tx }, rx)
    }

    /// Replaces the published list wholesale. Items absent from `items` are
    /// gone; there is no merging with the previous version.
    pub fn replace_all(&self, items: Vec<Product>) {
        self.tx.send_replace(ProductList::new(items));
    }

    pub fn subscribe(&self) -> watch::Receiver<ProductList> {
        self.tx.subscribe()
    }
}
