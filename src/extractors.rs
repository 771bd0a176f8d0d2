//! Request Extractors
//!
//! Axum extractors for the authenticated identity and the raw session
//! token.

use crate::session::Identity;
use crate::App;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// The identity of the logged-in user making this request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

/// The bearer token presented with this request
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Pull the bearer token out of the Authorization header
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, Response> {
    let header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| unauthorized_response("Authentication required"))?;

    if !header.starts_with("Bearer ") {
        return Err(unauthorized_response(
            "Invalid authorization header format",
        ));
    }

    Ok(header.trim_start_matches("Bearer "))
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<App>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // First, check if the identity was already resolved by middleware
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(CurrentUser(identity.clone()));
        }

        // If not in extensions, resolve the token directly
        let app = Arc::<App>::from_ref(state);
        let token = bearer_token(&parts.headers)?;

        match app.sessions.resolve(token).await.into_identity() {
            Some(identity) => Ok(CurrentUser(identity)),
            None => {
                tracing::debug!("session token did not resolve");
                Err(unauthorized_response("Invalid or expired session"))
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        Ok(SessionToken(token.to_string()))
    }
}
