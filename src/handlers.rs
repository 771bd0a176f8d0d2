//! HTTP Handlers
//!
//! JSON endpoints for account and catalog operations.

use crate::error::Error;
use crate::extractors::{CurrentUser, SessionToken};
use crate::middleware;
use crate::models::*;
use crate::App;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

/// Shared application state
pub type AppState = Arc<App>;

// ============================================
// Route Builder
// ============================================

/// Create the application routes
pub fn create_routes(app: Arc<App>) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    // Protected routes (require an authenticated session)
    let protected = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/books", get(list_books).post(add_book))
        .route(
            "/books/:title",
            get(get_book).put(update_book).delete(remove_book),
        )
        .layer(axum_middleware::from_fn_with_state(
            app.clone(),
            middleware::require_auth,
        ));

    Router::new().merge(public).merge(protected).with_state(app)
}

// ============================================
// Accounts
// ============================================

/// POST /auth/register
///
/// Create a new user account
pub async fn register(
    State(app): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Error> {
    req.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let user = app.registry.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Registration successful. Please log in.",
            "user": UserResponse::from(user)
        })),
    ))
}

/// POST /auth/login
///
/// Check credentials and start a session
pub async fn login(
    State(app): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, Error> {
    req.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let auth = app.registry.authenticate(&req.username, &req.password).await?;
    let token = app.sessions.issue(auth.id, &auth.username).await;

    tracing::info!(user_id = auth.id, "session started");

    Ok(Json(LoginResponse {
        user_id: auth.id,
        username: auth.username,
        session_token: token,
        token_type: "Bearer".to_string(),
    }))
}

/// POST /auth/logout
///
/// End the current session
pub async fn logout(
    State(app): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<impl IntoResponse, Error> {
    app.sessions.revoke(&token).await;

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /auth/me
///
/// Identity behind the current session
pub async fn me(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
    Json(serde_json::json!({
        "user": {
            "id": identity.user_id,
            "username": identity.username
        }
    }))
}

// ============================================
// Catalog
// ============================================

/// GET /books - List all books
pub async fn list_books(State(app): State<AppState>) -> Result<Json<Vec<Book>>, Error> {
    let books = app.catalog.list().await?;
    Ok(Json(books))
}

/// POST /books - Add a book
pub async fn add_book(
    State(app): State<AppState>,
    Json(req): Json<CreateBookRequest>,
) -> Result<impl IntoResponse, Error> {
    req.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let book = app.catalog.add(req).await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /books/:title - Get a book by title
pub async fn get_book(
    State(app): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<Book>, Error> {
    app.catalog
        .find(&title)
        .await?
        .map(Json)
        .ok_or(Error::BookNotFound)
}

/// PUT /books/:title - Rename a book and/or update its fields
pub async fn update_book(
    State(app): State<AppState>,
    Path(title): Path<String>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<Book>, Error> {
    req.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let book = app.catalog.update(&title, req).await?;

    Ok(Json(book))
}

/// DELETE /books/:title - Delete a book
pub async fn remove_book(
    State(app): State<AppState>,
    Path(title): Path<String>,
) -> Result<StatusCode, Error> {
    app.catalog.remove(&title).await?;

    Ok(StatusCode::NO_CONTENT)
}
