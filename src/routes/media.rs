use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    routes::{success, AppState},
    services::media::{self, AddMediaRequest, MediaListQuery, UpdateMediaRequest},
};

/// Filtered listing of one room
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
    Query(query): Query<MediaListQuery>,
) -> AppResult<Json<Value>> {
    let items = media::list_room_media(state.store.as_ref(), auth.user_id, room_id, &query).await?;
    Ok(Json(json!({ "items": items })))
}

pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
    Json(request): Json<AddMediaRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let item = media::add_media(state.store.as_ref(), auth.user_id, room_id, request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "mediaItem": item }))))
}

/// Items the caller created, across their rooms
pub async fn mine(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<MediaListQuery>,
) -> AppResult<Json<Value>> {
    let items = media::list_my_media(state.store.as_ref(), auth.user_id, &query).await?;
    Ok(Json(json!({ "items": items })))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMediaRequest>,
) -> AppResult<Json<Value>> {
    let item = media::update_media(state.store.as_ref(), auth.user_id, id, request).await?;
    Ok(Json(json!({ "mediaItem": item })))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    media::delete_media(state.store.as_ref(), auth.user_id, id).await?;
    Ok(success())
}

pub async fn unrated(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let items = media::unrated_in_room(state.store.as_ref(), auth.user_id, room_id).await?;
    Ok(Json(json!({ "items": items })))
}
