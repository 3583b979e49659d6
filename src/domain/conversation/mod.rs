//! Conversation domain: transcripts, personas, flow parameters and the
//! per-request lifecycle.
//!
//! The gateway's only authoritative state is the quota registry; everything
//! here is either an immutable constant or a value that lives for one request.

mod flow;
mod outcome;
mod persona;
mod state;
mod turn;

pub use flow::{
    period_label, FlowKind, FlowSpec, FlowVariant, GenerationParams, HistoryPolicy,
    ResponseFields,
};
pub use outcome::GatewayResult;
pub use persona::{
    PersonaContext, ADVOCATE, MEMO_DATE_PLACEHOLDER, STRATEGIST, STRATEGIST_SINGLE_SHOT,
};
pub use state::FlowState;
pub use turn::{ConversationHistory, ConversationTurn, TurnRole};
