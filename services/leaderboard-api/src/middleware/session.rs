// Copyright 2025 LLM Leaderboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Session middleware for per-viewer preferences.
//!
//! Reads the session id from the `x-session-id` header, or issues a fresh
//! one, stores it in the request extensions and echoes it on the response
//! so clients can keep using it.

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Longest accepted client-supplied id.
const MAX_SESSION_ID_LEN: usize = 128;

/// Session id attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

fn is_valid(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub async fn session_middleware(mut req: Request, next: Next) -> Response {
    let supplied = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|id| is_valid(id))
        .map(|s| s.to_string());

    let id = match supplied {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            debug!(session_id = %id, "Issued new session id");
            id
        }
    };

    req.extensions_mut().insert(SessionId(id.clone()));
    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// Extracts the [`SessionId`] set by [`session_middleware`].
///
/// ```ignore
/// async fn handler(ReqSession(session): ReqSession) -> impl IntoResponse {
///     // session.0 is the id
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ReqSession(pub SessionId);

impl std::ops::Deref for ReqSession {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0 .0
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for ReqSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .map(ReqSession)
            .ok_or_else(|| ApiError::bad_request("Session not established. Ensure session middleware is applied."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_validation() {
        assert!(is_valid("abc-123_DEF"));
        assert!(!is_valid(""));
        assert!(!is_valid("has space"));
        assert!(!is_valid(&"x".repeat(MAX_SESSION_ID_LEN + 1)));
    }
}
