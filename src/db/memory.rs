use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::store::{MediaStore, PreferenceStore, RoomStore, SessionStore, UserStore},
    error::{AppError, AppResult},
    models::{
        MediaEntry, MediaItem, MediaItemUpdate, Membership, NewMediaItem, Preference,
        PreferenceInput, PreferenceNotesUpdate, PreferenceWithUser, ProfileUpdate, Role, Room,
        RoomSummary, Session, User, UserSummary,
    },
    services::filter::MediaQuery,
};

/// Process-local store backed by hash maps.
///
/// Every write happens under a single write lock, so multi-row operations
/// (room creation, cascading deletes, upserts) are atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
    rooms: HashMap<Uuid, Room>,
    /// Keyed by (user, room)
    memberships: HashMap<(Uuid, Uuid), Membership>,
    media: HashMap<Uuid, MediaItem>,
    /// Keyed by media item, then user
    preferences: HashMap<Uuid, HashMap<Uuid, Preference>>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Inner {
    /// Strictly increasing timestamps keep recency ordering deterministic
    fn now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now
    }

    fn user_summary(&self, user_id: Uuid) -> UserSummary {
        self.users
            .get(&user_id)
            .map(User::summary)
            .unwrap_or_else(|| UserSummary {
                id: user_id,
                name: "Unknown".to_string(),
                image_url: None,
            })
    }

    fn preferences_for(&self, media_item_id: Uuid) -> Vec<&Preference> {
        let mut prefs: Vec<&Preference> = self
            .preferences
            .get(&media_item_id)
            .map(|by_user| by_user.values().collect())
            .unwrap_or_default();
        prefs.sort_by_key(|p| p.created_at);
        prefs
    }

    fn delete_media_cascade(&mut self, media_item_id: Uuid) {
        self.media.remove(&media_item_id);
        self.preferences.remove(&media_item_id);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == email) {
            return Err(AppError::InvalidInput("User already exists".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            image_url: None,
            password_hash: password_hash.to_string(),
            created_at: inner.now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> AppResult<Option<User>> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(image_url) = &update.image_url {
            user.image_url = image_url.clone();
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, session: &Session) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find_session(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self.inner.read().await.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> AppResult<()> {
        self.inner.write().await.sessions.remove(token);
        Ok(())
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn create_room(&self, name: &str, invite_code: &str, owner_id: Uuid) -> AppResult<Room> {
        let mut inner = self.inner.write().await;
        if inner.rooms.values().any(|r| r.invite_code == invite_code) {
            return Err(AppError::Internal("Invite code collision".to_string()));
        }
        let created_at = inner.now();
        let room = Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
            invite_code: invite_code.to_string(),
            created_at,
        };
        inner.rooms.insert(room.id, room.clone());
        inner.memberships.insert(
            (owner_id, room.id),
            Membership {
                user_id: owner_id,
                room_id: room.id,
                role: Role::Owner,
                created_at,
            },
        );
        Ok(room)
    }

    async fn get_room(&self, room_id: Uuid) -> AppResult<Option<Room>> {
        Ok(self.inner.read().await.rooms.get(&room_id).cloned())
    }

    async fn find_room_by_invite_code(&self, code: &str) -> AppResult<Option<Room>> {
        let inner = self.inner.read().await;
        Ok(inner.rooms.values().find(|r| r.invite_code == code).cloned())
    }

    async fn invite_code_exists(&self, code: &str) -> AppResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner.rooms.values().any(|r| r.invite_code == code))
    }

    async fn media_item_count(&self, room_id: Uuid) -> AppResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.media.values().filter(|m| m.room_id == room_id).count() as i64)
    }

    async fn list_rooms_for_user(&self, user_id: Uuid) -> AppResult<Vec<RoomSummary>> {
        let inner = self.inner.read().await;
        let mut summaries: Vec<RoomSummary> = inner
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| {
                let room = inner.rooms.get(&m.room_id)?;
                Some(RoomSummary {
                    room: room.clone(),
                    role: m.role,
                    member_count: inner
                        .memberships
                        .values()
                        .filter(|other| other.room_id == room.id)
                        .count() as i64,
                    media_item_count: inner
                        .media
                        .values()
                        .filter(|item| item.room_id == room.id)
                        .count() as i64,
                    joined_at: m.created_at,
                })
            })
            .collect();
        summaries.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
        Ok(summaries)
    }

    async fn delete_room(&self, room_id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.rooms.remove(&room_id);
        inner.memberships.retain(|_, m| m.room_id != room_id);
        let media_ids: Vec<Uuid> = inner
            .media
            .values()
            .filter(|item| item.room_id == room_id)
            .map(|item| item.id)
            .collect();
        for id in media_ids {
            inner.delete_media_cascade(id);
        }
        Ok(())
    }

    async fn get_membership(&self, user_id: Uuid, room_id: Uuid) -> AppResult<Option<Membership>> {
        let inner = self.inner.read().await;
        Ok(inner.memberships.get(&(user_id, room_id)).cloned())
    }

    async fn add_membership(
        &self,
        user_id: Uuid,
        room_id: Uuid,
        role: Role,
    ) -> AppResult<Membership> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.memberships.get(&(user_id, room_id)) {
            return Ok(existing.clone());
        }
        let membership = Membership {
            user_id,
            room_id,
            role,
            created_at: inner.now(),
        };
        inner
            .memberships
            .insert((user_id, room_id), membership.clone());
        Ok(membership)
    }

    async fn delete_membership(&self, user_id: Uuid, room_id: Uuid) -> AppResult<()> {
        self.inner
            .write()
            .await
            .memberships
            .remove(&(user_id, room_id));
        Ok(())
    }

    async fn room_member_ids(&self, room_id: Uuid) -> AppResult<Vec<Uuid>> {
        let inner = self.inner.read().await;
        Ok(inner
            .memberships
            .values()
            .filter(|m| m.room_id == room_id)
            .map(|m| m.user_id)
            .collect())
    }

    async fn room_ids_for_user(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let inner = self.inner.read().await;
        Ok(inner
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.room_id)
            .collect())
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn find_or_create_media_item(&self, item: NewMediaItem) -> AppResult<(MediaItem, bool)> {
        let mut inner = self.inner.write().await;
        if let Some(tmdb_id) = item.tmdb_id {
            if let Some(existing) = inner
                .media
                .values()
                .find(|m| m.room_id == item.room_id && m.tmdb_id == Some(tmdb_id))
            {
                return Ok((existing.clone(), false));
            }
        }
        let created_at = inner.now();
        let item = item.into_item(Uuid::new_v4(), created_at);
        inner.media.insert(item.id, item.clone());
        Ok((item, true))
    }

    async fn get_media_item(&self, id: Uuid) -> AppResult<Option<MediaItem>> {
        Ok(self.inner.read().await.media.get(&id).cloned())
    }

    async fn update_media_item(
        &self,
        id: Uuid,
        update: &MediaItemUpdate,
    ) -> AppResult<Option<MediaItem>> {
        let mut inner = self.inner.write().await;
        let Some(item) = inner.media.get_mut(&id) else {
            return Ok(None);
        };
        update.apply(item);
        Ok(Some(item.clone()))
    }

    async fn delete_media_item(&self, id: Uuid) -> AppResult<()> {
        self.inner.write().await.delete_media_cascade(id);
        Ok(())
    }

    async fn query_media(&self, query: &MediaQuery) -> AppResult<Vec<MediaEntry>> {
        let inner = self.inner.read().await;

        let mut entries: Vec<MediaEntry> = inner
            .media
            .values()
            .filter_map(|item| {
                let prefs = inner.preferences_for(item.id);
                let owned: Vec<Preference> = prefs.iter().map(|p| (*p).clone()).collect();
                if !query.matches(item, &owned) {
                    return None;
                }
                Some(MediaEntry {
                    item: item.clone(),
                    created_by_name: inner.user_summary(item.created_by).name,
                    room_name: inner
                        .rooms
                        .get(&item.room_id)
                        .map(|r| r.name.clone())
                        .unwrap_or_default(),
                    preferences: owned
                        .into_iter()
                        .map(|preference| PreferenceWithUser {
                            user: inner.user_summary(preference.user_id),
                            preference,
                        })
                        .collect(),
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.item
                .created_at
                .cmp(&a.item.created_at)
                .then_with(|| a.item.id.cmp(&b.item.id))
        });
        Ok(entries)
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn upsert_preference(
        &self,
        user_id: Uuid,
        media_item_id: Uuid,
        input: &PreferenceInput,
    ) -> AppResult<Preference> {
        let mut inner = self.inner.write().await;
        let now = inner.now();
        let preference = inner
            .preferences
            .entry(media_item_id)
            .or_default()
            .entry(user_id)
            .and_modify(|p| {
                p.status = input.status;
                p.excitement = input.excitement;
                p.notes = input.notes.clone();
                p.recommended_by_name = input.recommended_by_name.clone();
                p.recommendation_context = input.recommendation_context.clone();
                p.updated_at = now;
            })
            .or_insert_with(|| Preference {
                user_id,
                media_item_id,
                status: input.status,
                excitement: input.excitement,
                notes: input.notes.clone(),
                recommended_by_name: input.recommended_by_name.clone(),
                recommendation_context: input.recommendation_context.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(preference.clone())
    }

    async fn get_preference(
        &self,
        user_id: Uuid,
        media_item_id: Uuid,
    ) -> AppResult<Option<Preference>> {
        let inner = self.inner.read().await;
        Ok(inner
            .preferences
            .get(&media_item_id)
            .and_then(|by_user| by_user.get(&user_id))
            .cloned())
    }

    async fn update_preference_notes(
        &self,
        user_id: Uuid,
        media_item_id: Uuid,
        update: &PreferenceNotesUpdate,
    ) -> AppResult<Preference> {
        let mut inner = self.inner.write().await;
        let now = inner.now();
        let (status, excitement) = PreferenceNotesUpdate::default_rating();
        let preference = inner
            .preferences
            .entry(media_item_id)
            .or_default()
            .entry(user_id)
            .or_insert_with(|| Preference {
                user_id,
                media_item_id,
                status,
                excitement,
                notes: None,
                recommended_by_name: None,
                recommendation_context: None,
                created_at: now,
                updated_at: now,
            });
        update.apply(preference);
        preference.updated_at = now;
        Ok(preference.clone())
    }
}
