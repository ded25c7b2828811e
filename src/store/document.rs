//! Schemaless documents as the remote store hands them to us.
//!
//! A [`Document`] is a flat map of named fields. The store does not enforce a
//! schema, so a field can be absent or carry a value of the wrong type at any
//! time. The typed accessors ([`Document::str_field`], [`Document::int_field`])
//! absorb that: they return a default instead of failing, and the domain layer
//! decodes through them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of a document within its collection.
pub type DocumentId = String;

/// A flat map of field name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw field lookup. `None` when the field is absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String field with decode defaulting: a missing field, or a field
    /// holding a non-string value, reads as `""`.
    pub fn str_field(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::String(text)) => text.clone(),
            _ => String::new(),
        }
    }

    /// Integer field with decode defaulting: a missing field, or a field
    /// holding anything but a whole number, reads as `0`.
    pub fn int_field(&self, field: &str) -> i64 {
        self.0.get(field).and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn with_str(mut self, field: &str, value: impl Into<String>) -> Self {
        self.0.insert(field.to_string(), Value::String(value.into()));
        self
    }

    pub fn with_int(mut self, field: &str, value: i64) -> Self {
        self.0.insert(field.to_string(), Value::from(value));
        self
    }

    /// Inserts an arbitrary JSON value. Used to stage malformed fields in
    /// tests and by callers that carry non-scalar data.
    pub fn with_value(mut self, field: &str, value: Value) -> Self {
        self.0.insert(field.to_string(), value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A document together with the identity the store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Document,
}

impl StoredDocument {
    pub fn new(id: impl Into<DocumentId>, fields: Document) -> Self {
        Self { id: id.into(), fields }
    }
}
