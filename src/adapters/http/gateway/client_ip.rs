//! Client identity extractor.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::foundation::ClientId;

/// Forwarding header set by the fronting proxy.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Quota key of the calling client.
///
/// Taken from the left-most `X-Forwarded-For` address. A missing or
/// unreadable header yields the shared unknown-client bucket; extraction
/// never rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub ClientId);

#[async_trait]
impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok());
        Ok(ClientAddress(ClientId::from_forwarded_for(header)))
    }
}
