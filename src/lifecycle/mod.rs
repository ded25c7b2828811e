//! Wiring and observability: the composition root and tracing setup.

pub mod system;
pub mod tracing;

pub use self::system::*;
pub use self::tracing::*;
