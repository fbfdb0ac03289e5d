use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    routes::{success, AppState},
    services::rooms::{self, JoinedRoom},
};

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    invite_code: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    let rooms = rooms::list_rooms(state.store.as_ref(), auth.user_id).await?;
    Ok(Json(json!({ "rooms": rooms })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let room = rooms::create_room(state.store.as_ref(), auth.user_id, request.name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "room": room }))))
}

pub async fn join(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<JoinRoomRequest>,
) -> AppResult<Json<JoinedRoom>> {
    let joined =
        rooms::join_room(state.store.as_ref(), auth.user_id, request.invite_code.as_deref()).await?;
    Ok(Json(joined))
}

pub async fn leave(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    rooms::leave_room(state.store.as_ref(), auth.user_id, room_id).await?;
    Ok(success())
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    rooms::delete_room(state.store.as_ref(), auth.user_id, room_id).await?;
    Ok(success())
}
