use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        MediaEntry, MediaItem, MediaItemUpdate, Membership, NewMediaItem, Preference,
        PreferenceInput, PreferenceNotesUpdate, ProfileUpdate, Role, Room, RoomSummary, Session,
        User,
    },
    services::filter::MediaQuery,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `InvalidInput` when the email is taken
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> AppResult<User>;
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, session: &Session) -> AppResult<()>;
    async fn find_session(&self, token: &str) -> AppResult<Option<Session>>;
    async fn delete_session(&self, token: &str) -> AppResult<()>;
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Creates the room and the owner's membership together
    async fn create_room(&self, name: &str, invite_code: &str, owner_id: Uuid) -> AppResult<Room>;
    async fn get_room(&self, room_id: Uuid) -> AppResult<Option<Room>>;
    async fn find_room_by_invite_code(&self, code: &str) -> AppResult<Option<Room>>;
    async fn invite_code_exists(&self, code: &str) -> AppResult<bool>;
    async fn media_item_count(&self, room_id: Uuid) -> AppResult<i64>;
    /// Newest membership first
    async fn list_rooms_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoomSummary>>;
    /// Cascades to memberships, media items and preferences
    async fn delete_room(&self, room_id: Uuid) -> AppResult<()>;

    async fn get_membership(&self, user_id: Uuid, room_id: Uuid) -> AppResult<Option<Membership>>;
    async fn add_membership(&self, user_id: Uuid, room_id: Uuid, role: Role)
        -> AppResult<Membership>;
    async fn delete_membership(&self, user_id: Uuid, room_id: Uuid) -> AppResult<()>;
    async fn room_member_ids(&self, room_id: Uuid) -> AppResult<Vec<Uuid>>;
    async fn room_ids_for_user(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Returns the existing item when the room already holds the same catalog id.
    /// The flag is `true` when a new row was written.
    async fn find_or_create_media_item(&self, item: NewMediaItem) -> AppResult<(MediaItem, bool)>;
    async fn get_media_item(&self, id: Uuid) -> AppResult<Option<MediaItem>>;
    async fn update_media_item(
        &self,
        id: Uuid,
        update: &MediaItemUpdate,
    ) -> AppResult<Option<MediaItem>>;
    async fn delete_media_item(&self, id: Uuid) -> AppResult<()>;
    /// Matching items, newest first, each with all of its preferences
    async fn query_media(&self, query: &MediaQuery) -> AppResult<Vec<MediaEntry>>;
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Atomic create-or-replace of the (user, item) rating
    async fn upsert_preference(
        &self,
        user_id: Uuid,
        media_item_id: Uuid,
        input: &PreferenceInput,
    ) -> AppResult<Preference>;
    async fn get_preference(&self, user_id: Uuid, media_item_id: Uuid)
        -> AppResult<Option<Preference>>;
    /// Creates the preference with default rating when missing
    async fn update_preference_notes(
        &self,
        user_id: Uuid,
        media_item_id: Uuid,
        update: &PreferenceNotesUpdate,
    ) -> AppResult<Preference>;
}

pub trait Store: UserStore + SessionStore + RoomStore + MediaStore + PreferenceStore {}

impl<T> Store for T where T: UserStore + SessionStore + RoomStore + MediaStore + PreferenceStore {}
