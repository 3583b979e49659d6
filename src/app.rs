//! Application wiring: configuration to providers, limiters, controllers and
//! the HTTP router.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::ai::{GeminiConfig, GeminiProvider, GroqConfig, GroqProvider};
use crate::adapters::http::{gateway_router, GatewayAppState};
use crate::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
use crate::application::FlowController;
use crate::config::{AiConfig, AppConfig, FlowConfig, ProviderKind, ServerConfig, StrategistMode};
use crate::domain::conversation::{FlowSpec, FlowVariant};
use crate::ports::AIProvider;

/// Builds the provider adapter a flow is configured to use.
pub fn build_provider(kind: ProviderKind, ai: &AiConfig) -> Arc<dyn AIProvider> {
    match kind {
        ProviderKind::Groq => Arc::new(GroqProvider::new(
            GroqConfig::new(ai.groq_api_key.clone())
                .with_model(ai.groq_model.as_str())
                .with_base_url(ai.groq_base_url.as_str())
                .with_timeout(ai.timeout()),
        )),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            GeminiConfig::new(ai.gemini_api_key.clone())
                .with_model(ai.gemini_model.as_str())
                .with_base_url(ai.gemini_base_url.as_str())
                .with_timeout(ai.timeout()),
        )),
    }
}

/// Variant served on the strategist endpoint.
pub fn strategist_variant(mode: StrategistMode) -> FlowVariant {
    match mode {
        StrategistMode::Conversation => FlowVariant::StrategistConversation,
        StrategistMode::SingleShot => FlowVariant::StrategistSingleShot,
    }
}

/// Quota for `variant`, starting from its shipped preset.
pub fn rate_limit_config(variant: FlowVariant, flow: &FlowConfig) -> RateLimitConfig {
    let preset = RateLimitConfig::for_variant(variant);
    RateLimitConfig::new(
        flow.max_requests.unwrap_or(preset.max_requests),
        flow.window_secs.unwrap_or(preset.window_secs),
    )
    .with_max_clients(flow.max_clients.unwrap_or(preset.max_clients))
}

/// Flow parameters for `variant` with configured overrides.
pub fn flow_spec(variant: FlowVariant, flow: &FlowConfig) -> FlowSpec {
    let spec = FlowSpec::for_variant(variant);
    let cap = flow.max_history_turns.or(spec.max_history_turns);
    spec.with_max_history_turns(cap)
}

fn build_controller(variant: FlowVariant, flow: &FlowConfig, ai: &AiConfig) -> Arc<FlowController> {
    let spec = flow_spec(variant, flow);
    let limits = rate_limit_config(variant, flow);
    let provider = build_provider(flow.provider, ai);
    let info = provider.provider_info();

    tracing::info!(
        flow = %spec.kind(),
        variant = ?variant,
        provider = %info.name,
        model = %info.model,
        max_requests = limits.max_requests,
        window_secs = limits.window_secs,
        "flow configured"
    );

    Arc::new(FlowController::new(
        spec,
        provider,
        Arc::new(InMemoryRateLimiter::new(limits)),
    ))
}

/// Builds the shared handler state. Each flow gets its own quota registry.
pub fn build_state(config: &AppConfig) -> GatewayAppState {
    let advocate = build_controller(FlowVariant::Advocate, &config.flows.advocate, &config.ai);
    let strategist = build_controller(
        strategist_variant(config.flows.strategist.variant),
        &config.flows.strategist,
        &config.ai,
    );
    GatewayAppState::new(advocate, strategist)
}

/// CORS policy from `server.cors_origins`; unrestricted when none are set.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

/// Full router with tracing, request ids and CORS.
pub fn build_router(state: GatewayAppState, server: &ServerConfig) -> Router {
    gateway_router()
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Router for a loaded configuration.
pub fn build_app(config: &AppConfig) -> Router {
    build_router(build_state(config), &config.server)
}
