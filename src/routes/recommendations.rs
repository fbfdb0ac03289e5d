use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    routes::AppState,
    services::recommendations::{self, RecommendationRequest},
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<Uuid>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Value>> {
    let ranked =
        recommendations::recommend(state.store.as_ref(), room_id, auth.user_id, &request).await?;
    Ok(Json(json!({ "recommendations": ranked })))
}
