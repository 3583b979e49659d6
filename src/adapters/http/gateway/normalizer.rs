//! Error Normalizer: maps a [`GatewayResult`] to a status code and a single
//! field JSON body.
//!
//! | Result | Status | Field |
//! |---|---|---|
//! | `Ok` | 200 | success |
//! | `RateLimited` | 429 | success |
//! | `MalformedInput` | 400 | failure |
//! | `ConfigError`, `ProviderError` | 500 | failure |
//!
//! The mapping is a pure function of the result and the flow variant, so
//! repeating a failing request yields an identical response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

use crate::domain::conversation::{FlowVariant, GatewayResult};

/// A flow result bound to the variant that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResponse {
    pub status: StatusCode,
    pub field: &'static str,
    pub message: String,
}

impl NormalizedResponse {
    pub fn new(variant: FlowVariant, result: GatewayResult) -> Self {
        let fields = variant.response_fields();
        let (status, field) = match &result {
            GatewayResult::Ok(_) => (StatusCode::OK, fields.success),
            GatewayResult::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, fields.success),
            GatewayResult::MalformedInput(_) => (StatusCode::BAD_REQUEST, fields.failure),
            GatewayResult::ConfigError(_) | GatewayResult::ProviderError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, fields.failure)
            }
        };

        Self {
            status,
            field,
            message: result.message().to_string(),
        }
    }

    /// The JSON body, e.g. `{"reply": "..."}`.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert(self.field.to_string(), Value::String(self.message.clone()));
        Value::Object(body)
    }
}

impl IntoResponse for NormalizedResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}
