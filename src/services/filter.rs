//! Composable predicates over media items.
//!
//! A [`MediaQueryBuilder`] turns optional, loosely typed listing criteria into
//! an immutable [`MediaQuery`]: a flat conjunction of independent clauses.
//! Each store evaluates the same query value, either by rendering it to SQL
//! ([`MediaQuery::push_sql`]) or by testing it in memory ([`MediaQuery::matches`]).
//!
//! Clauses that look at preferences are existential over the item's
//! preference rows and are evaluated independently of each other, so two of
//! them may be satisfied by different rows.

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{MediaItem, MediaType, Preference, PreferenceStatus};

/// Sentinel accepted by `type` meaning "no constraint"
pub const ALL_TYPES: &str = "all";
/// Sentinel accepted by `myStatus` meaning "no constraint"
pub const UNRATED_STATUS: &str = "unrated";

/// Listing criteria as they arrive from a client
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    /// Comma-separated; only the first entry is applied
    pub genres: Option<String>,
    pub recommended_by: Option<String>,
    pub my_status: Option<String>,
}

/// A single conjunct of a [`MediaQuery`]
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    InRooms(Vec<Uuid>),
    TitleContains(String),
    TypeIs(MediaType),
    HasGenre(String),
    CreatedBy(Uuid),
    /// Some preference, from anyone, names this recommender
    AnyRecommendedBy(String),
    /// The given user rated the item with the given status
    FromUserWithStatus { user_id: Uuid, status: PreferenceStatus },
    /// The given user has not rated the item
    NoneFromUser(Uuid),
    /// Matches nothing; produced by unrecognised filter values
    Never,
}

impl Clause {
    fn matches(&self, item: &MediaItem, preferences: &[Preference]) -> bool {
        match self {
            Clause::InRooms(room_ids) => room_ids.contains(&item.room_id),
            Clause::TitleContains(needle) => item
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Clause::TypeIs(media_type) => item.media_type == *media_type,
            Clause::HasGenre(genre) => item.genres.iter().any(|g| g == genre),
            Clause::CreatedBy(user_id) => item.created_by == *user_id,
            Clause::AnyRecommendedBy(name) => preferences
                .iter()
                .any(|p| p.recommended_by_name.as_deref() == Some(name.as_str())),
            Clause::FromUserWithStatus { user_id, status } => preferences
                .iter()
                .any(|p| p.user_id == *user_id && p.status == *status),
            Clause::NoneFromUser(user_id) => !preferences.iter().any(|p| p.user_id == *user_id),
            Clause::Never => false,
        }
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Clause::InRooms(room_ids) => {
                qb.push("m.room_id = ANY(");
                qb.push_bind(room_ids.clone());
                qb.push(")");
            }
            Clause::TitleContains(needle) => {
                qb.push("m.title ILIKE ");
                qb.push_bind(format!("%{}%", escape_like(needle)));
            }
            Clause::TypeIs(media_type) => {
                qb.push("m.type = ");
                qb.push_bind(media_type.as_db_str());
            }
            Clause::HasGenre(genre) => {
                qb.push_bind(genre.clone());
                qb.push(" = ANY(m.genres)");
            }
            Clause::CreatedBy(user_id) => {
                qb.push("m.created_by = ");
                qb.push_bind(*user_id);
            }
            Clause::AnyRecommendedBy(name) => {
                qb.push(
                    "EXISTS (SELECT 1 FROM user_media_preferences p \
                     WHERE p.media_item_id = m.id AND p.recommended_by_name = ",
                );
                qb.push_bind(name.clone());
                qb.push(")");
            }
            Clause::FromUserWithStatus { user_id, status } => {
                qb.push(
                    "EXISTS (SELECT 1 FROM user_media_preferences p \
                     WHERE p.media_item_id = m.id AND p.user_id = ",
                );
                qb.push_bind(*user_id);
                qb.push(" AND p.status = ");
                qb.push_bind(status.as_db_str());
                qb.push(")");
            }
            Clause::NoneFromUser(user_id) => {
                qb.push(
                    "NOT EXISTS (SELECT 1 FROM user_media_preferences p \
                     WHERE p.media_item_id = m.id AND p.user_id = ",
                );
                qb.push_bind(*user_id);
                qb.push(")");
            }
            Clause::Never => {
                qb.push("FALSE");
            }
        }
    }
}

/// Immutable conjunction of clauses over media items
#[derive(Debug, Clone, PartialEq)]
pub struct MediaQuery {
    clauses: Vec<Clause>,
}

impl MediaQuery {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether the query can only ever produce an empty result
    pub fn is_never(&self) -> bool {
        self.clauses.contains(&Clause::Never)
    }

    /// In-memory evaluation against an item and all of its preferences
    pub fn matches(&self, item: &MediaItem, preferences: &[Preference]) -> bool {
        self.clauses.iter().all(|c| c.matches(item, preferences))
    }

    /// Appends ` WHERE <clause> AND <clause> ...` for a media table aliased `m`
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE TRUE");
        for clause in &self.clauses {
            qb.push(" AND ");
            clause.push_sql(qb);
        }
    }
}

/// Builds a [`MediaQuery`] one optional criterion at a time.
///
/// Every setter ignores absent or blank input, so callers can pass request
/// parameters straight through.
#[derive(Debug, Clone)]
pub struct MediaQueryBuilder {
    requesting_user: Uuid,
    clauses: Vec<Clause>,
}

impl MediaQueryBuilder {
    pub fn in_room(room_id: Uuid, requesting_user: Uuid) -> Self {
        Self::in_rooms(vec![room_id], requesting_user)
    }

    pub fn in_rooms(room_ids: Vec<Uuid>, requesting_user: Uuid) -> Self {
        Self {
            requesting_user,
            clauses: vec![Clause::InRooms(room_ids)],
        }
    }

    pub fn title_search(mut self, search: Option<&str>) -> Self {
        if let Some(search) = present(search) {
            self.clauses.push(Clause::TitleContains(search.to_string()));
        }
        self
    }

    pub fn media_type(mut self, media_type: Option<&str>) -> Self {
        if let Some(value) = present(media_type) {
            if !value.eq_ignore_ascii_case(ALL_TYPES) {
                self.clauses.push(match value.parse::<MediaType>() {
                    Ok(t) => Clause::TypeIs(t),
                    Err(_) => Clause::Never,
                });
            }
        }
        self
    }

    /// Comma-separated genre list; only the first non-blank entry constrains
    pub fn genres(self, genres: Option<&str>) -> Self {
        let first = genres.and_then(|g| g.split(',').next());
        self.genre(first)
    }

    /// Genre list already split; only the first entry constrains
    pub fn genre_list(self, genres: &[String]) -> Self {
        self.genre(genres.first().map(String::as_str))
    }

    fn genre(mut self, genre: Option<&str>) -> Self {
        if let Some(genre) = present(genre) {
            self.clauses.push(Clause::HasGenre(genre.to_string()));
        }
        self
    }

    pub fn recommended_by(mut self, name: Option<&str>) -> Self {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.clauses.push(Clause::AnyRecommendedBy(name.to_string()));
        }
        self
    }

    pub fn my_status(mut self, status: Option<&str>) -> Self {
        if let Some(value) = present(status) {
            if !value.eq_ignore_ascii_case(UNRATED_STATUS) {
                self.clauses.push(match value.parse::<PreferenceStatus>() {
                    Ok(status) => Clause::FromUserWithStatus {
                        user_id: self.requesting_user,
                        status,
                    },
                    Err(_) => Clause::Never,
                });
            }
        }
        self
    }

    pub fn created_by(mut self, user_id: Uuid) -> Self {
        self.clauses.push(Clause::CreatedBy(user_id));
        self
    }

    pub fn unrated_by(mut self, user_id: Uuid) -> Self {
        self.clauses.push(Clause::NoneFromUser(user_id));
        self
    }

    pub fn filter(self, filter: &MediaFilter) -> Self {
        self.title_search(filter.search.as_deref())
            .media_type(filter.media_type.as_deref())
            .genres(filter.genres.as_deref())
            .recommended_by(filter.recommended_by.as_deref())
            .my_status(filter.my_status.as_deref())
    }

    pub fn build(self) -> MediaQuery {
        MediaQuery {
            clauses: self.clauses,
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
