use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        room::{generate_invite_code, normalize_invite_code},
        Membership, Role, Room, RoomSummary,
    },
};

const MAX_INVITE_CODE_ATTEMPTS: usize = 16;

/// Result of redeeming an invite code
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRoom {
    pub room: Room,
    pub media_item_count: i64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub already_member: bool,
}

/// The caller's membership, or 403 when they are not in the room
pub async fn require_membership(
    store: &dyn Store,
    user_id: Uuid,
    room_id: Uuid,
) -> AppResult<Membership> {
    store
        .get_membership(user_id, room_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Not a member of this room".to_string()))
}

pub async fn list_rooms(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<RoomSummary>> {
    store.list_rooms_for_user(user_id).await
}

/// Creates a room owned by `user_id` under a fresh invite code
pub async fn create_room(store: &dyn Store, user_id: Uuid, name: Option<&str>) -> AppResult<Room> {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Room name is required".to_string()))?;

    let mut invite_code = None;
    for _ in 0..MAX_INVITE_CODE_ATTEMPTS {
        let candidate = generate_invite_code();
        if !store.invite_code_exists(&candidate).await? {
            invite_code = Some(candidate);
            break;
        }
    }
    let invite_code = invite_code
        .ok_or_else(|| AppError::Internal("Could not allocate an invite code".to_string()))?;

    let room = store.create_room(name, &invite_code, user_id).await?;
    tracing::info!(room_id = %room.id, user_id = %user_id, "Room created");
    Ok(room)
}

pub async fn join_room(
    store: &dyn Store,
    user_id: Uuid,
    invite_code: Option<&str>,
) -> AppResult<JoinedRoom> {
    let code = invite_code
        .map(normalize_invite_code)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Invite code is required".to_string()))?;

    let room = store
        .find_room_by_invite_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    let already_member = store.get_membership(user_id, room.id).await?.is_some();
    if !already_member {
        store.add_membership(user_id, room.id, Role::Member).await?;
        tracing::info!(room_id = %room.id, user_id = %user_id, "Joined room");
    }

    let media_item_count = store.media_item_count(room.id).await?;
    Ok(JoinedRoom {
        room,
        media_item_count,
        already_member,
    })
}

/// Members may leave; owners must delete the room instead
pub async fn leave_room(store: &dyn Store, user_id: Uuid, room_id: Uuid) -> AppResult<()> {
    let membership = require_membership(store, user_id, room_id).await?;
    if membership.role == Role::Owner {
        return Err(AppError::Forbidden(
            "Room owners cannot leave. Please delete the room instead.".to_string(),
        ));
    }

    store.delete_membership(user_id, room_id).await?;
    tracing::info!(room_id = %room_id, user_id = %user_id, "Left room");
    Ok(())
}

pub async fn delete_room(store: &dyn Store, user_id: Uuid, room_id: Uuid) -> AppResult<()> {
    let membership = require_membership(store, user_id, room_id).await?;
    if membership.role != Role::Owner {
        return Err(AppError::Forbidden(
            "Only room owners can delete rooms".to_string(),
        ));
    }

    store.delete_room(room_id).await?;
    tracing::info!(room_id = %room_id, user_id = %user_id, "Room deleted");
    Ok(())
}
