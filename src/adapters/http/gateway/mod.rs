//! HTTP adapter for the advocate and strategist endpoints.

mod client_ip;
mod dto;
mod handlers;
mod normalizer;
mod routes;

pub use client_ip::{ClientAddress, FORWARDED_FOR};
pub use dto::{
    decode_flow_input, AdvocateRequest, ConversationRequest, HealthResponse, IdeaRequest,
};
pub use handlers::{advocate_chat, health, strategist_chat, GatewayAppState};
pub use normalizer::NormalizedResponse;
pub use routes::gateway_router;
