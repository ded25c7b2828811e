//! Live synchronization of remote collections into local list state.

pub mod feed;
pub mod list;

pub use feed::*;
pub use list::*;
