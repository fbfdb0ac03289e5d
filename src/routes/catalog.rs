use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::CatalogDetails,
    routes::AppState,
    services::catalog,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
    #[serde(rename = "type")]
    scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Handler for catalog search endpoint
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    let results = catalog::search_catalog(
        state.catalog.as_ref(),
        params.query.as_deref(),
        params.scope.as_deref(),
    )
    .await?;
    Ok(Json(json!({ "results": results })))
}

pub async fn details(
    State(state): State<AppState>,
    Query(params): Query<DetailsQuery>,
) -> AppResult<Json<CatalogDetails>> {
    let details = catalog::catalog_details(
        state.catalog.as_ref(),
        params.id.as_deref(),
        params.kind.as_deref(),
    )
    .await?;
    Ok(Json(details))
}
