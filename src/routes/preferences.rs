use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    routes::AppState,
    services::preferences::{self, PreferenceNotesRequest, RatePreferenceRequest},
};

pub async fn rate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<RatePreferenceRequest>,
) -> AppResult<Json<Value>> {
    let preference = preferences::rate_media(state.store.as_ref(), auth.user_id, id, request).await?;
    Ok(Json(json!({ "preference": preference })))
}

pub async fn update_notes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<PreferenceNotesRequest>,
) -> AppResult<Json<Value>> {
    let preference =
        preferences::update_notes(state.store.as_ref(), auth.user_id, id, request).await?;
    Ok(Json(json!({ "preference": preference })))
}
