//! Domain entities and their document mappings.

pub mod product;
pub mod user;

pub use product::*;
pub use user::*;
