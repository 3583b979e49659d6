//! Application layer - orchestration between the domain and the ports.
//!
//! The flow controller sequences the per-request lifecycle; the prompt
//! assembler decides what the provider sees.

pub mod handlers;

pub use handlers::{FlowController, FlowInput, FlowOutcome, PromptAssembler};
