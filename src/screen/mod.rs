//! Headless screen state: what a renderer shows and how user intents enter
//! the system.

use std::fmt;

pub mod commands;
pub mod edit;
pub mod products;
pub mod register;

pub use commands::*;
pub use edit::*;
pub use products::*;
pub use register::*;

use crate::store::StoreError;

/// A user-facing message a renderer would surface as a toast or banner.
/// Queued on the owning screen and drained with `take_notices`.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    SaveFailed(StoreError),
    DeleteFailed(StoreError),
    SyncInterrupted(StoreError),
    RegistrationFailed(RegisterError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SaveFailed(error) => write!(f, "could not save product: {error}"),
            Notice::DeleteFailed(error) => write!(f, "could not delete product: {error}"),
            Notice::SyncInterrupted(error) => write!(f, "connection interrupted: {error}"),
            Notice::RegistrationFailed(error) => write!(f, "registration failed: {error}"),
        }
    }
}
