//! The user profile entity.
//!
//! Stored in the `users` collection, keyed by the auth user id, as
//! `{ username, email }`.

use serde::{Deserialize, Serialize};

use crate::store::Document;

/// Collection that holds user profile documents.
pub const USERS: &str = "users";

pub const FIELD_USERNAME: &str = "username";
pub const FIELD_EMAIL: &str = "email";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self { username: username.into(), email: email.into() }
    }

    pub fn to_document(&self) -> Document {
        Document::new()
            .with_str(FIELD_USERNAME, &self.username)
            .with_str(FIELD_EMAIL, &self.email)
    }

    pub fn from_document(fields: &Document) -> Self {
        Self {
            username: fields.str_field(FIELD_USERNAME),
            email: fields.str_field(FIELD_EMAIL),
        }
    }
}
