use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    routes::{success, AppState},
    services::accounts::{self, LoginRequest, LoginResponse, SignupRequest},
};

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let user = accounts::signup(state.store.as_ref(), request, state.bcrypt_cost).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = accounts::login(state.store.as_ref(), request, state.session_ttl_days).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Value>> {
    accounts::logout(state.store.as_ref(), &auth.token).await?;
    Ok(success())
}
