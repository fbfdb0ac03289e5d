//! Per-item reduction of preference rows.
//!
//! Everything here is pure: callers hand over the preferences already loaded
//! for an item and get back views and statistics.

use serde::Serialize;
use std::{cmp::Ordering, collections::HashSet};
use uuid::Uuid;

use crate::models::{
    Excitement, MediaEntry, MediaItem, Preference, PreferenceStatus, PreferenceWithUser,
    UserSummary,
};

/// Whether a preference expresses interest in watching
pub fn is_interested(preference: &Preference) -> bool {
    preference.status.is_interested()
}

pub fn my_preference(preferences: &[PreferenceWithUser], user_id: Uuid) -> Option<&PreferenceWithUser> {
    preferences.iter().find(|p| p.preference.user_id == user_id)
}

/// Another member's rating, stripped to what the listing shows
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OtherPreference {
    pub status: PreferenceStatus,
    pub excitement: Excitement,
    pub user: UserSummary,
}

pub fn other_preferences(preferences: &[PreferenceWithUser], user_id: Uuid) -> Vec<OtherPreference> {
    preferences
        .iter()
        .filter(|p| p.preference.user_id != user_id)
        .map(|p| OtherPreference {
            status: p.preference.status,
            excitement: p.preference.excitement,
            user: p.user.clone(),
        })
        .collect()
}

/// The caller's own rating as shown next to an item
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MyPreference {
    pub status: PreferenceStatus,
    pub excitement: Excitement,
    pub notes: Option<String>,
    pub recommended_by_name: Option<String>,
    pub recommendation_context: Option<String>,
}

impl From<&Preference> for MyPreference {
    fn from(p: &Preference) -> Self {
        MyPreference {
            status: p.status,
            excitement: p.excitement,
            notes: p.notes.clone(),
            recommended_by_name: p.recommended_by_name.clone(),
            recommendation_context: p.recommendation_context.clone(),
        }
    }
}

/// Interest of a set of room members in one item
#[derive(Debug, Clone, PartialEq)]
pub struct InterestStats {
    pub interested_count: usize,
    pub excitement_sum: u32,
    pub interested_users: Vec<UserSummary>,
}

impl InterestStats {
    /// Mean excitement of the interested members, rounded to one decimal
    pub fn avg_excitement(&self) -> f64 {
        round_one_decimal(self.excitement_sum as f64 / self.interested_count as f64)
    }

    /// Compares exact (unrounded) averages
    pub fn cmp_avg(&self, other: &InterestStats) -> Ordering {
        let lhs = self.excitement_sum as u64 * other.interested_count as u64;
        let rhs = other.excitement_sum as u64 * self.interested_count as u64;
        lhs.cmp(&rhs)
    }
}

/// Interest among `member_ids`; `None` when no member is interested
pub fn room_interest_stats(
    preferences: &[PreferenceWithUser],
    member_ids: &HashSet<Uuid>,
) -> Option<InterestStats> {
    let interested: Vec<&PreferenceWithUser> = preferences
        .iter()
        .filter(|p| member_ids.contains(&p.preference.user_id))
        .filter(|p| is_interested(&p.preference))
        .collect();

    if interested.is_empty() {
        return None;
    }

    Some(InterestStats {
        interested_count: interested.len(),
        excitement_sum: interested
            .iter()
            .map(|p| p.preference.excitement.value() as u32)
            .sum(),
        interested_users: interested.iter().map(|p| p.user.clone()).collect(),
    })
}

/// Half away from zero
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One row of a media listing
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaListing {
    #[serde(flatten)]
    pub item: MediaItem,
    /// Display name of the creator
    pub created_by: String,
    pub room_name: String,
    pub my_preference: Option<MyPreference>,
    pub other_preferences: Vec<OtherPreference>,
    pub preference_count: usize,
}

impl MediaListing {
    pub fn from_entry(entry: MediaEntry, user_id: Uuid) -> Self {
        let my_preference = my_preference(&entry.preferences, user_id)
            .map(|p| MyPreference::from(&p.preference));
        let other_preferences = other_preferences(&entry.preferences, user_id);
        MediaListing {
            preference_count: entry.preferences.len(),
            item: entry.item,
            created_by: entry.created_by_name,
            room_name: entry.room_name,
            my_preference,
            other_preferences,
        }
    }

    pub fn my_excitement(&self) -> u8 {
        self.my_preference
            .as_ref()
            .map(|p| p.excitement.value())
            .unwrap_or(0)
    }
}
