use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    routes::AppState,
    services::{
        accounts::{self, ProfileRequest},
        media,
    },
};

pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let user = accounts::get_profile(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<ProfileRequest>,
) -> AppResult<Json<Value>> {
    let user = accounts::update_profile(state.store.as_ref(), auth.user_id, request).await?;
    Ok(Json(json!({ "user": user })))
}

/// Everything the caller still has to rate, across rooms
pub async fn queue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let items = media::unrated_queue(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(json!({ "items": items })))
}
