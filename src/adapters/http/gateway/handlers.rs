//! HTTP handlers for the gateway endpoints.
//!
//! Handlers take the raw body so every failure, including an undecodable
//! body, goes through the owning flow and comes back normalized.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::FlowController;
use crate::domain::foundation::ClientId;

use super::client_ip::ClientAddress;
use super::dto::{decode_flow_input, HealthResponse};
use super::normalizer::NormalizedResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// One controller per endpoint. Each owns an independent quota registry.
#[derive(Clone)]
pub struct GatewayAppState {
    pub advocate: Arc<FlowController>,
    pub strategist: Arc<FlowController>,
}

impl GatewayAppState {
    pub fn new(advocate: Arc<FlowController>, strategist: Arc<FlowController>) -> Self {
        Self {
            advocate,
            strategist,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat
pub async fn advocate_chat(
    State(state): State<GatewayAppState>,
    ClientAddress(client): ClientAddress,
    body: Bytes,
) -> NormalizedResponse {
    run_flow(&state.advocate, &client, &body).await
}

/// POST /api/strategy
pub async fn strategist_chat(
    State(state): State<GatewayAppState>,
    ClientAddress(client): ClientAddress,
    body: Bytes,
) -> NormalizedResponse {
    run_flow(&state.strategist, &client, &body).await
}

/// GET /health
pub async fn health(State(state): State<GatewayAppState>) -> impl IntoResponse {
    Json(HealthResponse::ok(state.strategist.spec().variant))
}

async fn run_flow(controller: &FlowController, client: &ClientId, body: &[u8]) -> NormalizedResponse {
    let variant = controller.spec().variant;
    let outcome = match decode_flow_input(variant, body) {
        Ok(input) => controller.handle(client, input).await,
        Err(reason) => controller.reject(client, &reason),
    };
    NormalizedResponse::new(variant, outcome.result)
}
