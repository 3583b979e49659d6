//! Data Transfer Objects for the gateway endpoints.
//!
//! Request bodies are decoded by hand from raw bytes so that an unreadable
//! body still produces the flow's normalized JSON response instead of an
//! extractor rejection.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::FlowInput;
use crate::domain::conversation::{ConversationHistory, FlowVariant};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvocateRequest {
    /// Missing or `null` is treated as an empty message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/strategy` in conversation mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationRequest {
    #[serde(default)]
    pub messages: Option<ConversationHistory>,
}

/// Body of `POST /api/strategy` in single-shot mode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaRequest {
    #[serde(default)]
    pub idea: Option<String>,
}

/// Decodes a raw request body into the input shape `variant` accepts.
///
/// An empty body decodes like `{}`. The error string is safe to echo back
/// to the caller.
pub fn decode_flow_input(variant: FlowVariant, body: &[u8]) -> Result<FlowInput, String> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };

    match variant {
        FlowVariant::Advocate => {
            let request: AdvocateRequest = parse(body)?;
            Ok(FlowInput::Message(request.message.unwrap_or_default()))
        }
        FlowVariant::StrategistConversation => {
            let request: ConversationRequest = parse(body)?;
            Ok(FlowInput::History(request.messages.unwrap_or_default()))
        }
        FlowVariant::StrategistSingleShot => {
            let request: IdeaRequest = parse(body)?;
            Ok(FlowInput::Message(request.idea.unwrap_or_default()))
        }
    }
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    serde_json::from_slice(body)
        .map_err(|e| format!("request body is not valid JSON for this endpoint ({})", e))
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub strategist_variant: FlowVariant,
}

impl HealthResponse {
    pub fn ok(strategist_variant: FlowVariant) -> Self {
        Self {
            status: "ok".to_string(),
            strategist_variant,
        }
    }
}
