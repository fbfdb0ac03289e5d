use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::PreferenceWithUser;

/// Content type of a media item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
    Documentary,
    Other,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Movie,
        MediaType::Show,
        MediaType::Documentary,
        MediaType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
            MediaType::Documentary => "documentary",
            MediaType::Other => "other",
        }
    }

    pub fn as_db_str(self) -> &'static str {
        match self {
            MediaType::Movie => "MOVIE",
            MediaType::Show => "SHOW",
            MediaType::Documentary => "DOCUMENTARY",
            MediaType::Other => "OTHER",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown media type: {}", s))
    }
}

/// Where an item's metadata came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Tmdb,
    Manual,
}

impl SourceType {
    pub fn as_db_str(self) -> &'static str {
        match self {
            SourceType::Tmdb => "TMDB",
            SourceType::Manual => "MANUAL",
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tmdb" => Ok(SourceType::Tmdb),
            "manual" => Ok(SourceType::Manual),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

/// A title on a room's shared list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    pub room_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub tmdb_id: Option<i64>,
    pub source_type: SourceType,
    pub external_url: Option<String>,
    pub poster_url: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<i32>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    #[serde(rename = "createdByUserId")]
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Attributes of an item about to be added to a room
#[derive(Debug, Clone, PartialEq)]
pub struct NewMediaItem {
    pub room_id: Uuid,
    pub title: String,
    pub media_type: MediaType,
    pub tmdb_id: Option<i64>,
    pub source_type: SourceType,
    pub external_url: Option<String>,
    pub poster_url: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<i32>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub created_by: Uuid,
}

impl NewMediaItem {
    pub fn into_item(self, id: Uuid, created_at: DateTime<Utc>) -> MediaItem {
        MediaItem {
            id,
            room_id: self.room_id,
            title: self.title,
            media_type: self.media_type,
            tmdb_id: self.tmdb_id,
            source_type: self.source_type,
            external_url: self.external_url,
            poster_url: self.poster_url,
            description: self.description,
            genres: self.genres,
            runtime_minutes: self.runtime_minutes,
            rating: self.rating,
            release_date: self.release_date,
            created_by: self.created_by,
            created_at,
        }
    }
}

/// Partial edit of a manually entered item.
///
/// Outer `None` leaves the field as is; for nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaItemUpdate {
    pub title: Option<String>,
    pub media_type: Option<MediaType>,
    pub external_url: Option<Option<String>>,
    pub poster_url: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub genres: Option<Vec<String>>,
    pub runtime_minutes: Option<Option<i32>>,
    pub rating: Option<Option<f64>>,
    pub release_date: Option<Option<String>>,
}

impl MediaItemUpdate {
    pub fn is_empty(&self) -> bool {
        *self == MediaItemUpdate::default()
    }

    pub fn apply(&self, item: &mut MediaItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(media_type) = self.media_type {
            item.media_type = media_type;
        }
        if let Some(url) = &self.external_url {
            item.external_url = url.clone();
        }
        if let Some(url) = &self.poster_url {
            item.poster_url = url.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(genres) = &self.genres {
            item.genres = genres.clone();
        }
        if let Some(runtime) = self.runtime_minutes {
            item.runtime_minutes = runtime;
        }
        if let Some(rating) = self.rating {
            item.rating = rating;
        }
        if let Some(date) = &self.release_date {
            item.release_date = date.clone();
        }
    }
}

/// An item as returned by a listing query, with everything the
/// aggregation step needs already attached
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEntry {
    pub item: MediaItem,
    pub created_by_name: String,
    pub room_name: String,
    pub preferences: Vec<PreferenceWithUser>,
}
