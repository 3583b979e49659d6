//! Application handlers.

pub mod conversation;

pub use conversation::{FlowController, FlowInput, FlowOutcome, PromptAssembler};
