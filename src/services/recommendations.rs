//! "What should we watch?" ranking.
//!
//! Candidates come from the room's media listing narrowed by type and genre.
//! Preferences from users who are no longer members are ignored. Two modes:
//!
//! * `me`: items the caller is interested in, by the caller's excitement.
//! * `room`: items any member is interested in, by how many members are
//!   interested and then by their average excitement.
//!
//! Both modes fall back to newest-first and finally to item id, so the
//! order never depends on how the store happened to return rows.

use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashSet};
use uuid::Uuid;

use crate::{
    db::Store,
    error::AppResult,
    models::{MediaEntry, MediaType, Preference, PreferenceStatus},
    services::{
        aggregation::{is_interested, room_interest_stats, InterestStats},
        filter::MediaQueryBuilder,
        rooms::require_membership,
    },
};

/// Sentinel for `typePreference` meaning "no constraint"
pub const ANY_TYPE: &str = "any";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMode {
    Me,
    Room,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub mode: RecommendationMode,
    #[serde(default)]
    pub type_preference: Option<String>,
    /// Only the first entry narrows the candidates
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InterestedUser {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub poster_url: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<i32>,
    pub my_excitement: Option<u8>,
    pub my_status: Option<PreferenceStatus>,
    pub interested_count: usize,
    pub avg_excitement: f64,
    pub interested_users: Vec<InterestedUser>,
}

struct Candidate {
    entry: MediaEntry,
    mine: Option<Preference>,
    stats: Option<InterestStats>,
}

impl Candidate {
    fn my_excitement(&self) -> u8 {
        self.mine.as_ref().map(|p| p.excitement.value()).unwrap_or(0)
    }

    fn newest_first(&self, other: &Candidate) -> Ordering {
        other
            .entry
            .item
            .created_at
            .cmp(&self.entry.item.created_at)
            .then_with(|| self.entry.item.id.cmp(&other.entry.item.id))
    }

    fn into_recommendation(self) -> Recommendation {
        let (interested_count, avg_excitement, interested_users) = match &self.stats {
            Some(stats) => (
                stats.interested_count,
                stats.avg_excitement(),
                stats
                    .interested_users
                    .iter()
                    .map(|u| InterestedUser {
                        id: u.id,
                        name: u.name.clone(),
                    })
                    .collect(),
            ),
            None => (0, 0.0, Vec::new()),
        };

        let item = self.entry.item;
        Recommendation {
            id: item.id,
            title: item.title,
            media_type: item.media_type,
            poster_url: item.poster_url,
            description: item.description,
            genres: item.genres,
            runtime_minutes: item.runtime_minutes,
            my_excitement: self.mine.as_ref().map(|p| p.excitement.value()),
            my_status: self.mine.as_ref().map(|p| p.status),
            interested_count,
            avg_excitement,
            interested_users,
        }
    }
}

fn compare_solo(a: &Candidate, b: &Candidate) -> Ordering {
    b.my_excitement()
        .cmp(&a.my_excitement())
        .then_with(|| a.newest_first(b))
}

fn compare_room(a: &Candidate, b: &Candidate) -> Ordering {
    match (&a.stats, &b.stats) {
        (Some(sa), Some(sb)) => sb
            .interested_count
            .cmp(&sa.interested_count)
            .then_with(|| sb.cmp_avg(sa))
            .then_with(|| a.newest_first(b)),
        _ => a.newest_first(b),
    }
}

/// Orders candidate items for `user_id` among `member_ids`.
///
/// Pure: no I/O and no errors. Interest statistics are reported in both
/// modes so a solo pick can still show which members share the interest.
pub fn rank(
    entries: Vec<MediaEntry>,
    mode: RecommendationMode,
    user_id: Uuid,
    member_ids: &HashSet<Uuid>,
) -> Vec<Recommendation> {
    let mut candidates: Vec<Candidate> = entries
        .into_iter()
        .map(|mut entry| {
            entry
                .preferences
                .retain(|p| member_ids.contains(&p.preference.user_id));
            let mine = entry
                .preferences
                .iter()
                .find(|p| p.preference.user_id == user_id)
                .map(|p| p.preference.clone());
            let stats = room_interest_stats(&entry.preferences, member_ids);
            Candidate { entry, mine, stats }
        })
        .filter(|c| match mode {
            RecommendationMode::Me => c.mine.as_ref().is_some_and(is_interested),
            RecommendationMode::Room => c.stats.is_some(),
        })
        .collect();

    match mode {
        RecommendationMode::Me => candidates.sort_by(compare_solo),
        RecommendationMode::Room => candidates.sort_by(compare_room),
    }

    candidates
        .into_iter()
        .map(Candidate::into_recommendation)
        .collect()
}

/// Loads the room's candidates and ranks them for the caller
pub async fn recommend(
    store: &dyn Store,
    room_id: Uuid,
    user_id: Uuid,
    request: &RecommendationRequest,
) -> AppResult<Vec<Recommendation>> {
    require_membership(store, user_id, room_id).await?;

    let member_ids: HashSet<Uuid> = store.room_member_ids(room_id).await?.into_iter().collect();

    let type_preference = request
        .type_preference
        .as_deref()
        .filter(|t| !t.eq_ignore_ascii_case(ANY_TYPE));
    let query = MediaQueryBuilder::in_room(room_id, user_id)
        .media_type(type_preference)
        .genre_list(&request.genres)
        .build();

    let entries = store.query_media(&query).await?;
    let candidate_count = entries.len();
    let ranked = rank(entries, request.mode, user_id, &member_ids);

    tracing::info!(
        room_id = %room_id,
        mode = ?request.mode,
        candidates = candidate_count,
        ranked = ranked.len(),
        "Ranked recommendations"
    );

    Ok(ranked)
}
