//! The edit dialog's form state.
//!
//! An [`EditSession`] holds the text a user is typing. It is opened over a
//! copy of a product (or empty, for a new one) and from then on is isolated:
//! remote updates to the listing never touch an open draft. `quantity` stays
//! the raw entered string until save time, so intermediate states like `""`
//! or `"12x"` are representable while typing.

use crate::model::{Product, ProductDraft};
use crate::store::DocumentId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSession {
    pub name: String,
    pub quantity: String,
    pub description: String,
    target: Option<DocumentId>,
    open: bool,
}

impl EditSession {
    /// Opens the session over a copy of `product`. Saving will replace that
    /// document.
    pub fn begin(&mut self, product: &Product) {
        self.name = product.name.clone();
        self.quantity = product.quantity.to_string();
        self.description = product.description.clone();
        self.target = Some(product.id.clone());
        self.open = true;
    }

    /// Opens the session empty. Saving will create a new document.
    pub fn begin_new(&mut self) {
        self.name.clear();
        self.quantity.clear();
        self.description.clear();
        self.target = None;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.target = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The document this session edits, or `None` for a creation session.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// The staged fields. Quantity text that does not parse as a whole
    /// number comes out as `None`.
    pub fn draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            quantity: self.quantity.parse().ok(),
            description: self.description.clone(),
        }
    }
}
