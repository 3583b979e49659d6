//! Domain layer - value objects and flow definitions with no I/O.

pub mod conversation;
pub mod foundation;
