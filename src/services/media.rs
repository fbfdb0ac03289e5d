//! Room media lists: adding, editing and removing items, and the listings
//! built from the filter composer and the aggregator.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        double_option, non_empty, MediaEntry, MediaItem, MediaItemUpdate, MediaType,
        NewMediaItem, SourceType,
    },
    services::{
        aggregation::MediaListing,
        filter::{MediaFilter, MediaQueryBuilder},
        preferences::preference_input,
        rooms::require_membership,
    },
};

/// Catalog ids arrive as numbers from the search UI and as strings from forms
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TmdbIdInput {
    Number(i64),
    Text(String),
}

impl TmdbIdInput {
    fn parse(self) -> AppResult<Option<i64>> {
        match self {
            TmdbIdInput::Number(id) => Ok(Some(id)),
            TmdbIdInput::Text(text) if text.trim().is_empty() => Ok(None),
            TmdbIdInput::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| AppError::InvalidInput(format!("Invalid TMDB id: {}", text))),
        }
    }
}

/// Body of "add to room": the item plus the caller's first rating
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMediaRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub tmdb_id: Option<TmdbIdInput>,
    pub source_type: Option<String>,
    pub external_url: Option<String>,
    pub poster_url: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub runtime_minutes: Option<i32>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub status: Option<String>,
    pub excitement: Option<i64>,
    pub notes: Option<String>,
    pub recommended_by_name: Option<String>,
    pub recommendation_context: Option<String>,
}

/// Partial edit of a manual item; `null` or `""` clears optional fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub external_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub poster_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub genres: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub runtime_minutes: Option<Option<i32>>,
}

impl UpdateMediaRequest {
    fn into_update(self) -> AppResult<MediaItemUpdate> {
        let title = match self.title {
            Some(title) => Some(
                non_empty(Some(title))
                    .ok_or_else(|| AppError::InvalidInput("Title cannot be empty".to_string()))?,
            ),
            None => None,
        };

        Ok(MediaItemUpdate {
            title,
            media_type: self.media_type.as_deref().map(parse_media_type).transpose()?,
            external_url: self.external_url.map(non_empty),
            poster_url: self.poster_url.map(non_empty),
            description: self.description.map(non_empty),
            genres: self.genres.map(|g| clean_genres(g.unwrap_or_default())),
            runtime_minutes: self.runtime_minutes,
            ..Default::default()
        })
    }
}

/// Order applied on top of the newest-first listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Recent,
    MyExcitement,
    RoomExcitement,
}

impl SortBy {
    /// Unknown values keep the recency order
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("myExcitement") => SortBy::MyExcitement,
            Some("roomExcitement") => SortBy::RoomExcitement,
            _ => SortBy::Recent,
        }
    }

    /// Stable, so ties stay newest first
    pub fn apply(self, listings: &mut [MediaListing]) {
        match self {
            SortBy::Recent => {}
            SortBy::MyExcitement => listings.sort_by_key(|l| Reverse(l.my_excitement())),
            SortBy::RoomExcitement => listings.sort_by_key(|l| Reverse(l.preference_count)),
        }
    }
}

/// Query string of the listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListQuery {
    #[serde(flatten)]
    pub filter: MediaFilter,
    pub sort_by: Option<String>,
}

/// An item waiting for the caller's first rating
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnratedItem {
    #[serde(flatten)]
    pub item: MediaItem,
    /// Display name of the creator
    pub created_by: String,
    pub room_name: String,
}

impl From<MediaEntry> for UnratedItem {
    fn from(entry: MediaEntry) -> Self {
        UnratedItem {
            item: entry.item,
            created_by: entry.created_by_name,
            room_name: entry.room_name,
        }
    }
}

fn parse_media_type(raw: &str) -> AppResult<MediaType> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid media type: {}", raw)))
}

fn clean_genres(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .filter_map(|g| non_empty(Some(g)))
        .collect()
}

fn listings(entries: Vec<MediaEntry>, user_id: Uuid, sort_by: Option<&str>) -> Vec<MediaListing> {
    let mut listings: Vec<MediaListing> = entries
        .into_iter()
        .map(|entry| MediaListing::from_entry(entry, user_id))
        .collect();
    SortBy::from_param(sort_by).apply(&mut listings);
    listings
}

/// Adds an item to a room (or finds the room's existing copy of the same
/// catalog title) and records the caller's rating of it
pub async fn add_media(
    store: &dyn Store,
    user_id: Uuid,
    room_id: Uuid,
    request: AddMediaRequest,
) -> AppResult<MediaItem> {
    require_membership(store, user_id, room_id).await?;

    let title = non_empty(request.title);
    let (Some(title), Some(media_type)) = (title, request.media_type.as_deref()) else {
        return Err(AppError::InvalidInput(
            "Title, type, status, and excitement are required".to_string(),
        ));
    };
    let media_type = parse_media_type(media_type)?;
    let rating = preference_input(
        request.status.as_deref(),
        request.excitement,
        request.notes,
        request.recommended_by_name,
        request.recommendation_context,
        "Title, type, status, and excitement are required",
    )?;

    let tmdb_id = request.tmdb_id.map(TmdbIdInput::parse).transpose()?.flatten();
    let source_type = match request.source_type.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => raw
            .parse::<SourceType>()
            .map_err(|_| AppError::InvalidInput(format!("Invalid source type: {}", raw)))?,
        None if tmdb_id.is_some() => SourceType::Tmdb,
        None => SourceType::Manual,
    };

    let (item, created) = store
        .find_or_create_media_item(NewMediaItem {
            room_id,
            title,
            media_type,
            tmdb_id,
            source_type,
            external_url: non_empty(request.external_url),
            poster_url: non_empty(request.poster_url),
            description: non_empty(request.description),
            genres: clean_genres(request.genres),
            runtime_minutes: request.runtime_minutes,
            rating: request.rating,
            release_date: non_empty(request.release_date),
            created_by: user_id,
        })
        .await?;

    store.upsert_preference(user_id, item.id, &rating).await?;

    tracing::info!(
        room_id = %room_id,
        media_item_id = %item.id,
        tmdb_id = ?item.tmdb_id,
        created,
        "Media item added"
    );
    Ok(item)
}

/// A room's list, filtered and projected for the caller
pub async fn list_room_media(
    store: &dyn Store,
    user_id: Uuid,
    room_id: Uuid,
    query: &MediaListQuery,
) -> AppResult<Vec<MediaListing>> {
    require_membership(store, user_id, room_id).await?;

    let media_query = MediaQueryBuilder::in_room(room_id, user_id)
        .filter(&query.filter)
        .build();
    let entries = store.query_media(&media_query).await?;
    tracing::debug!(room_id = %room_id, count = entries.len(), "Listed room media");

    Ok(listings(entries, user_id, query.sort_by.as_deref()))
}

/// Items the caller created, across every room they belong to
pub async fn list_my_media(
    store: &dyn Store,
    user_id: Uuid,
    query: &MediaListQuery,
) -> AppResult<Vec<MediaListing>> {
    let room_ids = store.room_ids_for_user(user_id).await?;
    if room_ids.is_empty() {
        return Ok(Vec::new());
    }

    let media_query = MediaQueryBuilder::in_rooms(room_ids, user_id)
        .created_by(user_id)
        .filter(&query.filter)
        .build();
    let entries = store.query_media(&media_query).await?;

    Ok(listings(entries, user_id, query.sort_by.as_deref()))
}

/// Edits a manually entered item; any member of its room may do so
pub async fn update_media(
    store: &dyn Store,
    user_id: Uuid,
    media_item_id: Uuid,
    request: UpdateMediaRequest,
) -> AppResult<MediaItem> {
    let item = store
        .get_media_item(media_item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media item not found".to_string()))?;
    require_membership(store, user_id, item.room_id).await?;

    if item.source_type != SourceType::Manual {
        return Err(AppError::Forbidden(
            "Only manually added items can be edited".to_string(),
        ));
    }

    let update = request.into_update()?;
    if update.is_empty() {
        return Ok(item);
    }

    let updated = store
        .update_media_item(media_item_id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Media item not found".to_string()))?;
    tracing::info!(media_item_id = %media_item_id, user_id = %user_id, "Media item updated");
    Ok(updated)
}

/// Only the creator may remove an item; its preferences go with it
pub async fn delete_media(store: &dyn Store, user_id: Uuid, media_item_id: Uuid) -> AppResult<()> {
    let item = store
        .get_media_item(media_item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media item not found".to_string()))?;
    require_membership(store, user_id, item.room_id).await?;

    if item.created_by != user_id {
        return Err(AppError::Forbidden(
            "You can only delete items you created".to_string(),
        ));
    }

    store.delete_media_item(media_item_id).await?;
    tracing::info!(media_item_id = %media_item_id, room_id = %item.room_id, "Media item deleted");
    Ok(())
}

/// Items in one room the caller has not rated yet
pub async fn unrated_in_room(
    store: &dyn Store,
    user_id: Uuid,
    room_id: Uuid,
) -> AppResult<Vec<UnratedItem>> {
    require_membership(store, user_id, room_id).await?;

    let query = MediaQueryBuilder::in_room(room_id, user_id)
        .unrated_by(user_id)
        .build();
    let entries = store.query_media(&query).await?;
    Ok(entries.into_iter().map(UnratedItem::from).collect())
}

/// Items the caller has not rated, across all of their rooms
pub async fn unrated_queue(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<UnratedItem>> {
    let room_ids = store.room_ids_for_user(user_id).await?;
    if room_ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = MediaQueryBuilder::in_rooms(room_ids, user_id)
        .unrated_by(user_id)
        .build();
    let entries = store.query_media(&query).await?;
    tracing::debug!(user_id = %user_id, count = entries.len(), "Built rating queue");
    Ok(entries.into_iter().map(UnratedItem::from).collect())
}
