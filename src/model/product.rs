//! The product entity and its wire mapping.
//!
//! A product lives in the `products` collection as a flat document:
//! `{ name, quantity, description, ownerId }`. Decoding never fails; fields
//! that are absent or mistyped fall back to `""` / `0` so one malformed
//! remote document cannot take the whole listing down.

use serde::{Deserialize, Serialize};

use crate::store::{Document, DocumentId, StoredDocument};

/// Collection that holds product documents.
pub const PRODUCTS: &str = "products";

pub const FIELD_NAME: &str = "name";
pub const FIELD_QUANTITY: &str = "quantity";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_OWNER_ID: &str = "ownerId";

/// A product as the listing shows it. The id is the document id and is never
/// stored inside the document itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: DocumentId,
    pub name: String,
    pub quantity: i64,
    pub description: String,
}

impl Product {
    pub fn new(
        id: impl Into<DocumentId>,
        name: impl Into<String>,
        quantity: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            description: description.into(),
        }
    }

    /// Decodes a stored document, defaulting each missing or mistyped field.
    pub fn from_document(doc: &StoredDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.fields.str_field(FIELD_NAME),
            quantity: doc.fields.int_field(FIELD_QUANTITY),
            description: doc.fields.str_field(FIELD_DESCRIPTION),
        }
    }
}

/// The fields of a product as an edit session stages them, before an identity
/// or an owner is attached. `quantity` is `None` when the entered text does
/// not parse as a whole number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub quantity: Option<i64>,
    pub description: String,
}

impl ProductDraft {
    /// Encodes the draft for storage, stamping the owner. An unparsable
    /// quantity is normalized to `0` here, at the last moment before the
    /// write.
    pub fn to_document(&self, owner: &str) -> Document {
        Document::new()
            .with_str(FIELD_NAME, &self.name)
            .with_int(FIELD_QUANTITY, self.quantity.unwrap_or(0))
            .with_str(FIELD_DESCRIPTION, &self.description)
            .with_str(FIELD_OWNER_ID, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_complete_document() {
        let doc = StoredDocument::new(
            "p1",
            Document::new()
                .with_str(FIELD_NAME, "Rice")
                .with_int(FIELD_QUANTITY, 12)
                .with_str(FIELD_DESCRIPTION, "long grain")
                .with_str(FIELD_OWNER_ID, "u1"),
        );
        assert_eq!(Product::from_document(&doc), Product::new("p1", "Rice", 12, "long grain"));
    }

    #[test]
    fn decodes_an_empty_document_with_defaults() {
        let doc = StoredDocument::new("p1", Document::new());
        assert_eq!(Product::from_document(&doc), Product::new("p1", "", 0, ""));
    }

    #[test]
    fn mistyped_fields_fall_back_per_field() {
        // quantity stored as text, name stored as a number.
        let doc = StoredDocument::new(
            "p1",
            Document::new()
                .with_value(FIELD_NAME, json!(7))
                .with_str(FIELD_QUANTITY, "12")
                .with_str(FIELD_DESCRIPTION, "kept"),
        );
        let product = Product::from_document(&doc);
        assert_eq!(product.name, "");
        assert_eq!(product.quantity, 0);
        assert_eq!(product.description, "kept");
    }

    #[test]
    fn draft_encodes_all_fields_and_stamps_owner() {
        let draft = ProductDraft {
            name: "Rice".into(),
            quantity: Some(12),
            description: "long grain".into(),
        };
        let doc = draft.to_document("u1");
        assert_eq!(doc.str_field(FIELD_NAME), "Rice");
        assert_eq!(doc.int_field(FIELD_QUANTITY), 12);
        assert_eq!(doc.str_field(FIELD_DESCRIPTION), "long grain");
        assert_eq!(doc.str_field(FIELD_OWNER_ID), "u1");
    }

    #[test]
    fn draft_without_quantity_encodes_zero() {
        let draft = ProductDraft { name: "Rice".into(), quantity: None, description: "".into() };
        assert_eq!(draft.to_document("u1").int_field(FIELD_QUANTITY), 0);
    }
}
