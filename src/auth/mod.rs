//! The authentication capability.
//!
//! [`AuthGateway`] covers exactly what the screens need from an identity
//! provider: who is signed in right now, creating a credential during
//! registration, and attaching a display name to a fresh account. Creating a
//! credential signs the new user in as a side effect, which is what lets the
//! registration flow write the profile document under the new user id.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::*;

/// Identity of an authenticated user, as assigned by the provider.
pub type UserId = String;

/// Failure reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// A credential already exists for this email.
    #[error("email already registered: {0}")]
    EmailInUse(String),

    /// The provider's password policy rejected the password.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// The referenced account does not exist.
    #[error("no such user: {0}")]
    UnknownUser(UserId),

    /// The provider could not be reached.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;

    /// Creates a credential for `email` and signs the new user in. Returns
    /// the assigned user id.
    async fn create_credential(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    /// Attaches a display name to an account.
    async fn set_display_name(&self, user: &str, name: &str) -> Result<(), AuthError>;
}
