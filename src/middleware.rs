//! Authentication Middleware
//!
//! Resolves the bearer session token before protected handlers run and
//! stores the identity in request extensions for extractors.

use crate::extractors::bearer_token;
use crate::session::Session;
use crate::App;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Require an authenticated session
///
/// Rejects the request before it reaches the handler unless the bearer
/// token resolves to a logged-in identity.
pub async fn require_auth(
    State(app): State<Arc<App>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers())?.to_string();

    let session = app.sessions.resolve(&token).await;
    match session {
        Session::Authenticated(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Session::Anonymous => {
            tracing::debug!("rejected request with unknown session token");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Invalid or expired session"
                })),
            )
                .into_response())
        }
    }
}
