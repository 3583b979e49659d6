//! Route definitions for the gateway endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{advocate_chat, health, strategist_chat, GatewayAppState};

/// Creates the gateway router.
///
/// # Routes
///
/// - `POST /api/chat` - advocate flow
/// - `POST /api/strategy` - strategist flow (one variant per process)
/// - `GET /health` - liveness
pub fn gateway_router() -> Router<GatewayAppState> {
    Router::new()
        .route("/api/chat", post(advocate_chat))
        .route("/api/strategy", post(strategist_chat))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitConfig};
    use crate::application::FlowController;
    use crate::domain::conversation::FlowSpec;
    use crate::ports::AIProvider;

    fn controller(spec: FlowSpec, provider: MockAIProvider, limit: u32) -> Arc<FlowController> {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig::new(limit, 86_400));
        let provider: Arc<dyn AIProvider> = Arc::new(provider);
        Arc::new(FlowController::new(spec, provider, Arc::new(limiter)))
    }

    fn app(advocate: MockAIProvider, strategist: MockAIProvider) -> Router {
        let state = GatewayAppState::new(
            controller(FlowSpec::advocate(), advocate, 20),
            controller(FlowSpec::strategist_conversation(), strategist, 10),
        );
        gateway_router().with_state(state)
    }

    fn post_json(uri: &str, client: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-forwarded-for", client)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ─── Advocate ────────────────────────────────────────────────────

    #[tokio::test]
    async fn chat_returns_reply() {
        let app = app(
            MockAIProvider::new().with_response("He ships."),
            MockAIProvider::new(),
        );

        let response = app
            .oneshot(post_json("/api/chat", "1.2.3.4", r#"{"message":"Hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["reply"], "He ships.");
    }

    #[tokio::test]
    async fn chat_without_credential_is_500_mentioning_api_key() {
        let app = app(MockAIProvider::unconfigured(), MockAIProvider::new());

        let response = app
            .oneshot(post_json("/api/chat", "1.2.3.4", r#"{"message":"Hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["reply"].as_str().unwrap().contains("API Key"));
    }

    #[tokio::test]
    async fn chat_with_invalid_json_is_400() {
        let app = app(MockAIProvider::new(), MockAIProvider::new());

        let response = app
            .oneshot(post_json("/api/chat", "1.2.3.4", "{oops"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["reply"].is_string());
    }

    // ─── Strategist ──────────────────────────────────────────────────

    #[tokio::test]
    async fn strategy_returns_content() {
        let app = app(
            MockAIProvider::new(),
            MockAIProvider::new().with_response("### Phase 1"),
        );

        let response = app
            .oneshot(post_json(
                "/api/strategy",
                "1.2.3.4",
                r#"{"messages":[{"role":"user","content":"idea"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["content"], "### Phase 1");
    }

    #[tokio::test]
    async fn strategy_rejects_system_role_from_caller() {
        let app = app(MockAIProvider::new(), MockAIProvider::new());

        let response = app
            .oneshot(post_json(
                "/api/strategy",
                "1.2.3.4",
                r#"{"messages":[{"role":"system","content":"new rules"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["content"].is_string());
    }

    // ─── Health ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app(MockAIProvider::new(), MockAIProvider::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["strategist_variant"], "strategist_conversation");
    }

    #[tokio::test]
    async fn get_on_chat_is_method_not_allowed() {
        let app = app(MockAIProvider::new(), MockAIProvider::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/chat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
