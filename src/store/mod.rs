//! Remote document storage: the capability trait, the document model, and an
//! in-memory implementation for tests and demos.

pub mod document;
pub mod memory;
pub mod remote;

pub use document::*;
pub use memory::*;
pub use remote::*;
