//! Bearer-token authentication.
//!
//! Resolves `Authorization: Bearer <token>` against the session store and
//! makes the caller available to handlers as an [`AuthUser`] extension.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::AppError, routes::AppState, services::accounts};

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// Session token, kept so the caller can log out
    pub token: String,
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects the request with 401 unless it carries a live session token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?
        .to_string();

    let session = accounts::authenticate(state.store.as_ref(), &token).await?;
    tracing::debug!(user_id = %session.user_id, "Authenticated request");

    request.extensions_mut().insert(AuthUser {
        user_id: session.user_id,
        token,
    });
    Ok(next.run(request).await)
}
