use serde::Deserialize;
use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        double_option, non_empty, Excitement, MediaItem, Preference, PreferenceInput,
        PreferenceNotesUpdate, PreferenceStatus,
    },
    services::rooms::require_membership,
};

/// Body of a full rating
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePreferenceRequest {
    pub status: Option<String>,
    pub excitement: Option<i64>,
    pub notes: Option<String>,
    pub recommended_by_name: Option<String>,
    pub recommendation_context: Option<String>,
}

/// Body of a notes-only update; `null` clears a field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceNotesRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recommended_by_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recommendation_context: Option<Option<String>>,
}

impl From<PreferenceNotesRequest> for PreferenceNotesUpdate {
    fn from(req: PreferenceNotesRequest) -> Self {
        PreferenceNotesUpdate {
            notes: req.notes.map(non_empty),
            recommended_by_name: req.recommended_by_name.map(non_empty),
            recommendation_context: req.recommendation_context.map(non_empty),
        }
    }
}

pub fn parse_status(raw: &str) -> AppResult<PreferenceStatus> {
    raw.parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid status: {}", raw)))
}

pub fn parse_excitement(raw: i64) -> AppResult<Excitement> {
    Excitement::try_from(raw).map_err(AppError::InvalidInput)
}

/// Validated rating fields; `missing` is the message used when status or
/// excitement is absent
pub fn preference_input(
    status: Option<&str>,
    excitement: Option<i64>,
    notes: Option<String>,
    recommended_by_name: Option<String>,
    recommendation_context: Option<String>,
    missing: &str,
) -> AppResult<PreferenceInput> {
    let (Some(status), Some(excitement)) = (status.filter(|s| !s.trim().is_empty()), excitement)
    else {
        return Err(AppError::InvalidInput(missing.to_string()));
    };

    Ok(PreferenceInput {
        status: parse_status(status)?,
        excitement: parse_excitement(excitement)?,
        notes: non_empty(notes),
        recommended_by_name: non_empty(recommended_by_name),
        recommendation_context: non_empty(recommendation_context),
    })
}

/// Loads an item the caller may rate: it must exist and be in one of their rooms
async fn rateable_item(store: &dyn Store, user_id: Uuid, media_item_id: Uuid) -> AppResult<MediaItem> {
    let item = store
        .get_media_item(media_item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media item not found".to_string()))?;
    require_membership(store, user_id, item.room_id).await?;
    Ok(item)
}

/// Creates or replaces the caller's rating of an item
pub async fn rate_media(
    store: &dyn Store,
    user_id: Uuid,
    media_item_id: Uuid,
    request: RatePreferenceRequest,
) -> AppResult<Preference> {
    let input = preference_input(
        request.status.as_deref(),
        request.excitement,
        request.notes,
        request.recommended_by_name,
        request.recommendation_context,
        "Status and excitement are required",
    )?;
    rateable_item(store, user_id, media_item_id).await?;

    let preference = store.upsert_preference(user_id, media_item_id, &input).await?;
    tracing::info!(
        user_id = %user_id,
        media_item_id = %media_item_id,
        status = %preference.status,
        excitement = preference.excitement.value(),
        "Preference saved"
    );
    Ok(preference)
}

/// Updates only the free-text fields, creating a default rating when missing
pub async fn update_notes(
    store: &dyn Store,
    user_id: Uuid,
    media_item_id: Uuid,
    request: PreferenceNotesRequest,
) -> AppResult<Preference> {
    rateable_item(store, user_id, media_item_id).await?;
    let update = PreferenceNotesUpdate::from(request);
    store
        .update_preference_notes(user_id, media_item_id, &update)
        .await
}
