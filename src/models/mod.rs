use serde::{Deserialize, Deserializer};

pub mod catalog;
pub mod media;
pub mod preference;
pub mod room;
pub mod user;

pub use catalog::{CatalogDetails, CatalogKind, CatalogSearchResult, SearchScope};
pub use media::{MediaEntry, MediaItem, MediaItemUpdate, MediaType, NewMediaItem, SourceType};
pub use preference::{
    Excitement, Preference, PreferenceInput, PreferenceNotesUpdate, PreferenceStatus,
    PreferenceWithUser,
};
pub use room::{Membership, Role, Room, RoomSummary};
pub use user::{ProfileUpdate, Session, User, UserProfile, UserSummary};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
///
/// Use together with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Blank strings from forms count as missing
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
