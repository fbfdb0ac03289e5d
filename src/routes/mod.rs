use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Store,
    middleware::{make_span_with_request_id, request_id_middleware, require_auth},
    services::providers::CatalogProvider,
};

pub mod auth;
pub mod catalog;
pub mod media;
pub mod preferences;
pub mod recommendations;
pub mod rooms;
pub mod users;

const DEFAULT_SESSION_TTL_DAYS: i64 = 30;
const DEFAULT_BCRYPT_COST: u32 = 10;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub session_ttl_days: i64,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            store,
            catalog,
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    pub fn with_session_ttl_days(mut self, days: i64) -> Self {
        self.session_ttl_days = days;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/user/profile", get(users::profile).patch(users::update_profile))
        .route("/user/queue", get(users::queue))
        .route("/rooms", get(rooms::list).post(rooms::create))
        .route("/rooms/join", post(rooms::join))
        .route("/rooms/:room_id", delete(rooms::delete))
        .route("/rooms/:room_id/leave", post(rooms::leave))
        .route("/rooms/:room_id/unrated", get(media::unrated))
        .route("/rooms/:room_id/media", get(media::list).post(media::add))
        .route("/rooms/:room_id/recommendations", post(recommendations::recommend))
        .route("/media", get(media::mine))
        .route("/media/:id", patch(media::update).delete(media::delete))
        .route(
            "/media/:id/preference",
            post(preferences::rate).patch(preferences::update_notes),
        )
        .route("/catalog/search", get(catalog::search))
        .route("/catalog/details", get(catalog::details))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Body of endpoints that only acknowledge
fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}
