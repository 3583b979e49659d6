//! Foundation value objects shared across the domain.

mod client_id;
mod state_machine;
mod timestamp;

pub use client_id::{ClientId, UNKNOWN_CLIENT};
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;
