use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::UserSummary;

/// How a user feels about a media item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceStatus {
    NotSeenWant,
    NotSeenDontWant,
    SeenWouldRewatch,
    SeenWontRewatch,
}

impl PreferenceStatus {
    pub const ALL: [PreferenceStatus; 4] = [
        PreferenceStatus::NotSeenWant,
        PreferenceStatus::NotSeenDontWant,
        PreferenceStatus::SeenWouldRewatch,
        PreferenceStatus::SeenWontRewatch,
    ];

    /// Whether this status counts as wanting to watch the item
    pub fn is_interested(self) -> bool {
        matches!(
            self,
            PreferenceStatus::NotSeenWant | PreferenceStatus::SeenWouldRewatch
        )
    }

    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceStatus::NotSeenWant => "not_seen_want",
            PreferenceStatus::NotSeenDontWant => "not_seen_dont_want",
            PreferenceStatus::SeenWouldRewatch => "seen_would_rewatch",
            PreferenceStatus::SeenWontRewatch => "seen_wont_rewatch",
        }
    }

    /// Storage representation
    pub fn as_db_str(self) -> &'static str {
        match self {
            PreferenceStatus::NotSeenWant => "NOT_SEEN_WANT",
            PreferenceStatus::NotSeenDontWant => "NOT_SEEN_DONT_WANT",
            PreferenceStatus::SeenWouldRewatch => "SEEN_WOULD_REWATCH",
            PreferenceStatus::SeenWontRewatch => "SEEN_WONT_REWATCH",
        }
    }
}

impl Display for PreferenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case-insensitive; accepts both the wire and the storage spelling
impl FromStr for PreferenceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown preference status: {}", s))
    }
}

/// Excitement score, always within 1..=5
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "u8")]
pub struct Excitement(u8);

impl Excitement {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Excitement {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Excitement(value as u8))
        } else {
            Err("Excitement must be between 1 and 5".to_string())
        }
    }
}

impl From<Excitement> for u8 {
    fn from(excitement: Excitement) -> Self {
        excitement.0
    }
}

/// One user's rating of one media item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub user_id: Uuid,
    pub media_item_id: Uuid,
    pub status: PreferenceStatus,
    pub excitement: Excitement,
    pub notes: Option<String>,
    pub recommended_by_name: Option<String>,
    pub recommendation_context: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A preference together with the public identity of its owner
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceWithUser {
    #[serde(flatten)]
    pub preference: Preference,
    pub user: UserSummary,
}

/// Fields written by a full rating (create-or-update)
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceInput {
    pub status: PreferenceStatus,
    pub excitement: Excitement,
    pub notes: Option<String>,
    pub recommended_by_name: Option<String>,
    pub recommendation_context: Option<String>,
}

/// Partial update of the free-text fields; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceNotesUpdate {
    pub notes: Option<Option<String>>,
    pub recommended_by_name: Option<Option<String>>,
    pub recommendation_context: Option<Option<String>>,
}

impl PreferenceNotesUpdate {
    /// Status and excitement given to a preference created by a notes-only update
    pub fn default_rating() -> (PreferenceStatus, Excitement) {
        (PreferenceStatus::NotSeenWant, Excitement(3))
    }

    pub fn apply(&self, preference: &mut Preference) {
        if let Some(notes) = &self.notes {
            preference.notes = notes.clone();
        }
        if let Some(name) = &self.recommended_by_name {
            preference.recommended_by_name = name.clone();
        }
        if let Some(context) = &self.recommendation_context {
            preference.recommendation_context = context.clone();
        }
    }
}
