//! Conversation flow handlers.
//!
//! Turns decoded caller input into a provider call and a normalized result.

mod flow_controller;
mod prompt_assembler;

pub use flow_controller::{FlowController, FlowOutcome};
pub use prompt_assembler::{FlowInput, PromptAssembler};
