use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        double_option, non_empty, user::normalize_email, ProfileUpdate, Session, UserProfile,
    },
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
    pub user: UserProfile,
}

/// Partial profile edit; `imageUrl` of `null` or `""` removes the avatar
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
}

async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?
        .map_err(AppError::from)
}

pub async fn signup(store: &dyn Store, request: SignupRequest, bcrypt_cost: u32) -> AppResult<UserProfile> {
    let name = non_empty(request.name);
    let email = request.email.map(|e| normalize_email(&e)).filter(|e| !e.is_empty());
    let password = request.password.filter(|p| !p.is_empty());
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        return Err(AppError::InvalidInput(
            "Name, email, and password are required".to_string(),
        ));
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::InvalidInput("User already exists".to_string()));
    }

    let password_hash = hash_password(password, bcrypt_cost).await?;
    let user = store.create_user(&name, &email, &password_hash).await?;
    tracing::info!(user_id = %user.id, "Account created");
    Ok(user.profile())
}

/// Checks credentials and opens a session valid for `ttl_days`
pub async fn login(store: &dyn Store, request: LoginRequest, ttl_days: i64) -> AppResult<LoginResponse> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(invalid());
    };

    let user = store
        .find_user_by_email(&normalize_email(&email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = %user.id, "Rejected login");
        return Err(invalid());
    }

    let now = Utc::now();
    let session = Session {
        token: Uuid::new_v4().simple().to_string(),
        user_id: user.id,
        created_at: now,
        expires_at: now + Duration::days(ttl_days),
    };
    store.create_session(&session).await?;
    tracing::info!(user_id = %user.id, "Session opened");

    Ok(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: user.profile(),
    })
}

pub async fn logout(store: &dyn Store, token: &str) -> AppResult<()> {
    store.delete_session(token).await
}

/// Resolves a bearer token; expired sessions are removed on sight
pub async fn authenticate(store: &dyn Store, token: &str) -> AppResult<Session> {
    let session = store
        .find_session(token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

    if session.is_expired(Utc::now()) {
        store.delete_session(token).await?;
        return Err(AppError::Unauthorized("Session expired".to_string()));
    }
    Ok(session)
}

pub async fn get_profile(store: &dyn Store, user_id: Uuid) -> AppResult<UserProfile> {
    store
        .get_user(user_id)
        .await?
        .map(|u| u.profile())
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn update_profile(
    store: &dyn Store,
    user_id: Uuid,
    request: ProfileRequest,
) -> AppResult<UserProfile> {
    let name = match request.name {
        Some(name) => Some(non_empty(Some(name)).ok_or_else(|| {
            AppError::InvalidInput("Name must be a non-empty string".to_string())
        })?),
        None => None,
    };
    let update = ProfileUpdate {
        name,
        image_url: request.image_url.map(non_empty),
    };

    if update == ProfileUpdate::default() {
        return get_profile(store, user_id).await;
    }

    store
        .update_profile(user_id, &update)
        .await?
        .map(|u| u.profile())
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
