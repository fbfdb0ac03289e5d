use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use watchroom_api::{
    db::MemoryStore,
    error::{AppError, AppResult},
    models::{CatalogDetails, CatalogKind, CatalogSearchResult, MediaType, SearchScope},
    routes::{create_router, AppState},
    services::providers::CatalogProvider,
};

/// Canned catalog with one movie and one show
struct StubCatalog;

#[async_trait]
impl CatalogProvider for StubCatalog {
    async fn search(&self, query: &str, scope: SearchScope) -> AppResult<Vec<CatalogSearchResult>> {
        let mut results = Vec::new();
        if scope.includes_movies() {
            results.push(CatalogSearchResult {
                id: 603,
                title: format!("{} (movie)", query),
                release_date: Some("1999-03-30".to_string()),
                poster_path: None,
                media_type: MediaType::Movie,
                overview: None,
            });
        }
        if scope.includes_tv() {
            results.push(CatalogSearchResult {
                id: 1396,
                title: format!("{} (show)", query),
                release_date: None,
                poster_path: None,
                media_type: MediaType::Show,
                overview: None,
            });
        }
        Ok(results)
    }

    async fn details(&self, id: i64, kind: CatalogKind) -> AppResult<CatalogDetails> {
        if id != 603 {
            return Err(AppError::NotFound("TMDB item not found".to_string()));
        }
        Ok(CatalogDetails {
            id,
            title: "The Matrix".to_string(),
            media_type: kind.media_type(),
            overview: Some("Neo".to_string()),
            poster_path: Some("/m.jpg".to_string()),
            poster_url: Some("https://img.test/m.jpg".to_string()),
            genres: vec!["Action".to_string()],
            runtime_minutes: Some(136),
            release_date: Some("1999-03-30".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

const TEST_BCRYPT_COST: u32 = 4;

fn create_test_server() -> TestServer {
    let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(StubCatalog))
        .with_bcrypt_cost(TEST_BCRYPT_COST);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Signs up and logs in; returns (token, user id)
async fn login_as(server: &TestServer, name: &str) -> (String, String) {
    let email = format!("{}@example.com", name.to_lowercase());
    server
        .post("/api/v1/auth/signup")
        .json(&json!({ "name": name, "email": email, "password": "hunter22" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": email, "password": "hunter22" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_room(server: &TestServer, token: &str, name: &str) -> (String, String) {
    let response = server
        .post("/api/v1/rooms")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&json!({ "name": name }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    (
        body["room"]["id"].as_str().unwrap().to_string(),
        body["room"]["inviteCode"].as_str().unwrap().to_string(),
    )
}

async fn join_room(server: &TestServer, token: &str, code: &str) -> Value {
    let response = server
        .post("/api/v1/rooms/join")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&json!({ "inviteCode": code }))
        .await;
    response.assert_status_ok();
    response.json()
}

async fn add_media(server: &TestServer, token: &str, room_id: &str, body: Value) -> Value {
    let response = server
        .post(&format!("/api/v1/rooms/{}/media", room_id))
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["mediaItem"].clone()
}

async fn rate(server: &TestServer, token: &str, item_id: &str, body: Value) -> Value {
    let response = server
        .post(&format!("/api/v1/media/{}/preference", item_id))
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&body)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["preference"].clone()
}

fn titles(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            header::HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-me-42"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-me-42");

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert!(!generated.is_empty());
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let server = create_test_server();

    let response = server.get("/api/v1/rooms").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body["error"].is_string());

    let response = server
        .get("/api/v1/rooms")
        .add_header(header::AUTHORIZATION, bearer("not-a-session"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_account_lifecycle() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({ "name": "Ana", "email": "ana@example.com", "password": "123" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Password must be at least 6 characters" }));

    let (token, user_id) = login_as(&server, "Ana").await;

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({ "name": "Ana 2", "email": " ANA@example.com", "password": "hunter22" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "User already exists" }));

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ana@example.com", "password": "wrong-password" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .patch("/api/v1/user/profile")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "name": "Ana B.", "imageUrl": "https://img.test/ana.png" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["name"], "Ana B.");
    assert_eq!(body["user"]["imageUrl"], "https://img.test/ana.png");

    let response = server
        .patch("/api/v1/user/profile")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "imageUrl": null }))
        .await;
    let body: Value = response.json();
    assert!(body["user"]["imageUrl"].is_null());
    assert_eq!(body["user"]["name"], "Ana B.");

    server
        .post("/api/v1/auth/logout")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();

    server
        .get("/api/v1/user/profile")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_room_membership_rules() {
    let server = create_test_server();
    let (ana, _) = login_as(&server, "Ana").await;
    let (ben, _) = login_as(&server, "Ben").await;

    let response = server
        .post("/api/v1/rooms")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .json(&json!({ "name": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Room name is required" }));

    let (room_id, code) = create_room(&server, &ana, "Friday Films").await;

    let joined = join_room(&server, &ben, &code.to_lowercase()).await;
    assert_eq!(joined["room"]["id"], room_id.as_str());
    assert_eq!(joined["mediaItemCount"], 0);
    assert!(joined.get("alreadyMember").is_none());

    let again = join_room(&server, &ben, &code).await;
    assert_eq!(again["alreadyMember"], true);

    let response = server
        .post("/api/v1/rooms/join")
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .json(&json!({ "inviteCode": "NOPE00" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .get("/api/v1/rooms")
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await;
    let body: Value = response.json();
    assert_eq!(body["rooms"][0]["role"], "member");
    assert_eq!(body["rooms"][0]["memberCount"], 2);

    server
        .post(&format!("/api/v1/rooms/{}/leave", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .delete(&format!("/api/v1/rooms/{}", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = server
        .post(&format!("/api/v1/rooms/{}/leave", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "success": true }));

    server
        .get(&format!("/api/v1/rooms/{}/media", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .delete(&format!("/api/v1/rooms/{}", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await
        .assert_status_ok();

    let body: Value = server
        .get("/api/v1/rooms")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await
        .json();
    assert_eq!(body["rooms"], json!([]));
}

#[tokio::test]
async fn test_add_media_dedupes_catalog_titles() {
    let server = create_test_server();
    let (ana, _) = login_as(&server, "Ana").await;
    let (ben, _) = login_as(&server, "Ben").await;
    let (room_id, code) = create_room(&server, &ana, "Den").await;
    join_room(&server, &ben, &code).await;

    let response = server
        .post(&format!("/api/v1/rooms/{}/media", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .json(&json!({ "title": "Heat", "type": "movie" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Title, type, status, and excitement are required" }));

    let first = add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Heat", "type": "movie", "tmdbId": 949, "status": "not_seen_want", "excitement": 4 }),
    )
    .await;
    assert_eq!(first["sourceType"], "tmdb");
    assert_eq!(first["type"], "movie");

    let second = add_media(
        &server,
        &ben,
        &room_id,
        json!({ "title": "Heat", "type": "movie", "tmdbId": "949", "status": "SEEN_WOULD_REWATCH", "excitement": 5 }),
    )
    .await;
    assert_eq!(second["id"], first["id"]);

    let body: Value = server
        .get(&format!("/api/v1/rooms/{}/media", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await
        .json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["createdBy"], "Ana");
    assert_eq!(items[0]["preferenceCount"], 2);
    assert_eq!(items[0]["myPreference"]["excitement"], 4);
    assert_eq!(items[0]["otherPreferences"][0]["status"], "seen_would_rewatch");
    assert_eq!(items[0]["otherPreferences"][0]["user"]["name"], "Ben");
}

#[tokio::test]
async fn test_listing_filters() {
    let server = create_test_server();
    let (ana, _) = login_as(&server, "Ana").await;
    let (ben, _) = login_as(&server, "Ben").await;
    let (room_id, code) = create_room(&server, &ana, "Den").await;
    join_room(&server, &ben, &code).await;

    let drama = add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Drama Only", "type": "movie", "genres": ["Drama"], "status": "not_seen_want", "excitement": 3 }),
    )
    .await;
    add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Comedy Drama", "type": "show", "genres": ["Comedy", "Drama"], "status": "seen_wont_rewatch", "excitement": 2 }),
    )
    .await;

    // Ben's row carries the recommender, Ana's row carries the status
    rate(
        &server,
        &ben,
        drama["id"].as_str().unwrap(),
        json!({ "status": "not_seen_dont_want", "excitement": 1, "recommendedByName": "Sam" }),
    )
    .await;

    let list = |params: &'static [(&'static str, &'static str)]| {
        let mut request = server
            .get(&format!("/api/v1/rooms/{}/media", room_id))
            .add_header(header::AUTHORIZATION, bearer(&ana));
        for (key, value) in params {
            request = request.add_query_param(key, value);
        }
        request
    };

    let body: Value = list(&[("recommendedBy", "Sam"), ("myStatus", "not_seen_want")]).await.json();
    assert_eq!(titles(&body["items"]), vec!["Drama Only"]);

    let body: Value = list(&[("genres", "Comedy,Drama")]).await.json();
    assert_eq!(titles(&body["items"]), vec!["Comedy Drama"]);

    let body: Value = list(&[("type", "show")]).await.json();
    assert_eq!(titles(&body["items"]), vec!["Comedy Drama"]);

    let body: Value = list(&[("type", "all"), ("myStatus", "unrated")]).await.json();
    assert_eq!(titles(&body["items"]), vec!["Comedy Drama", "Drama Only"]);

    let body: Value = list(&[("type", "podcast")]).await.json();
    assert_eq!(body["items"], json!([]));

    let body: Value = list(&[("search", "only")]).await.json();
    assert_eq!(titles(&body["items"]), vec!["Drama Only"]);

    let body: Value = list(&[("sortBy", "myExcitement")]).await.json();
    assert_eq!(titles(&body["items"]), vec!["Drama Only", "Comedy Drama"]);
}

#[tokio::test]
async fn test_preference_upsert_and_notes() {
    let server = create_test_server();
    let (ana, _) = login_as(&server, "Ana").await;
    let (ben, _) = login_as(&server, "Ben").await;
    let (room_id, code) = create_room(&server, &ana, "Den").await;
    join_room(&server, &ben, &code).await;

    let item = add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Heat", "type": "movie", "status": "not_seen_want", "excitement": 3 }),
    )
    .await;
    let item_id = item["id"].as_str().unwrap();

    let response = server
        .post(&format!("/api/v1/media/{}/preference", item_id))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .json(&json!({ "status": "not_seen_want", "excitement": 9 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Excitement must be between 1 and 5" }));

    rate(&server, &ben, item_id, json!({ "status": "not_seen_want", "excitement": 2 })).await;
    let latest = rate(&server, &ben, item_id, json!({ "status": "not_seen_want", "excitement": 5 })).await;
    assert_eq!(latest["excitement"], 5);

    let body: Value = server
        .get(&format!("/api/v1/rooms/{}/media", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await
        .json();
    assert_eq!(body["items"][0]["preferenceCount"], 2);
    assert_eq!(body["items"][0]["otherPreferences"][0]["excitement"], 5);

    let response = server
        .patch(&format!("/api/v1/media/{}/preference", item_id))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .json(&json!({ "notes": "Bring snacks" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["preference"]["notes"], "Bring snacks");
    assert_eq!(body["preference"]["excitement"], 5);
}

#[tokio::test]
async fn test_edit_and_delete_media() {
    let server = create_test_server();
    let (ana, _) = login_as(&server, "Ana").await;
    let (ben, _) = login_as(&server, "Ben").await;
    let (room_id, code) = create_room(&server, &ana, "Den").await;
    join_room(&server, &ben, &code).await;

    let manual = add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Home Video", "type": "other", "genres": ["Family"], "status": "not_seen_want", "excitement": 3 }),
    )
    .await;
    let manual_id = manual["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/v1/media/{}", manual_id))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .json(&json!({ "title": "Holiday Video", "genres": null, "externalUrl": "" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["mediaItem"]["title"], "Holiday Video");
    assert_eq!(body["mediaItem"]["genres"], json!([]));
    assert!(body["mediaItem"]["externalUrl"].is_null());

    let catalog = add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Heat", "type": "movie", "tmdbId": 949, "status": "not_seen_want", "excitement": 3 }),
    )
    .await;
    let response = server
        .patch(&format!("/api/v1/media/{}", catalog["id"].as_str().unwrap()))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .json(&json!({ "title": "Heat 2" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({ "error": "Only manually added items can be edited" }));

    server
        .delete(&format!("/api/v1/media/{}", manual_id))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .delete(&format!("/api/v1/media/{}", manual_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await
        .assert_status_ok();

    server
        .patch(&format!("/api/v1/media/{}", manual_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .json(&json!({ "title": "Gone" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let bens = add_media(
        &server,
        &ben,
        &room_id,
        json!({ "title": "Ronin", "type": "movie", "status": "not_seen_want", "excitement": 4 }),
    )
    .await;
    server
        .post(&format!("/api/v1/rooms/{}/leave", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await
        .assert_status_ok();

    let response = server
        .delete(&format!("/api/v1/media/{}", bens["id"].as_str().unwrap()))
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({ "error": "Not a member of this room" }));
}

#[tokio::test]
async fn test_unrated_queue_and_my_media() {
    let server = create_test_server();
    let (ana, _) = login_as(&server, "Ana").await;
    let (ben, _) = login_as(&server, "Ben").await;
    let (room_id, code) = create_room(&server, &ana, "Den").await;
    join_room(&server, &ben, &code).await;

    add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Heat", "type": "movie", "status": "not_seen_want", "excitement": 3 }),
    )
    .await;

    let body: Value = server
        .get("/api/v1/user/queue")
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await
        .json();
    assert_eq!(titles(&body["items"]), vec!["Heat"]);
    assert_eq!(body["items"][0]["roomName"], "Den");
    assert_eq!(body["items"][0]["roomId"], room_id.as_str());
    assert_eq!(body["items"][0]["createdBy"], "Ana");

    let body: Value = server
        .get(&format!("/api/v1/rooms/{}/unrated", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await
        .json();
    assert_eq!(body["items"], json!([]));

    let body: Value = server
        .get("/api/v1/media")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await
        .json();
    assert_eq!(titles(&body["items"]), vec!["Heat"]);

    let body: Value = server
        .get("/api/v1/media")
        .add_header(header::AUTHORIZATION, bearer(&ben))
        .await
        .json();
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_room_recommendations() {
    let server = create_test_server();
    let (ana, _) = login_as(&server, "Ana").await;
    let (ben, _) = login_as(&server, "Ben").await;
    let (cy, _) = login_as(&server, "Cy").await;
    let (room_id, code) = create_room(&server, &ana, "Den").await;
    join_room(&server, &ben, &code).await;
    join_room(&server, &cy, &code).await;

    let loved = add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Loved by two", "type": "movie", "genres": ["Comedy"], "status": "not_seen_want", "excitement": 5 }),
    )
    .await;
    rate(&server, &ben, loved["id"].as_str().unwrap(), json!({ "status": "not_seen_want", "excitement": 4 })).await;

    let liked = add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Liked by three", "type": "show", "status": "not_seen_want", "excitement": 2 }),
    )
    .await;
    for token in [&ben, &cy] {
        rate(&server, token, liked["id"].as_str().unwrap(), json!({ "status": "seen_would_rewatch", "excitement": 2 })).await;
    }

    let nobody = add_media(
        &server,
        &ana,
        &room_id,
        json!({ "title": "Nobody", "type": "movie", "status": "not_seen_dont_want", "excitement": 5 }),
    )
    .await;
    rate(&server, &ben, nobody["id"].as_str().unwrap(), json!({ "status": "not_seen_dont_want", "excitement": 5 })).await;

    let response = server
        .post(&format!("/api/v1/rooms/{}/recommendations", room_id))
        .add_header(header::AUTHORIZATION, bearer(&cy))
        .json(&json!({ "mode": "room", "typePreference": "any" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let recs = &body["recommendations"];
    assert_eq!(titles(recs), vec!["Liked by three", "Loved by two"]);
    assert_eq!(recs[0]["interestedCount"], 3);
    assert_eq!(recs[1]["avgExcitement"], 4.5);
    assert_eq!(recs[1]["interestedUsers"].as_array().unwrap().len(), 2);

    let body: Value = server
        .post(&format!("/api/v1/rooms/{}/recommendations", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .json(&json!({ "mode": "me" }))
        .await
        .json();
    assert_eq!(titles(&body["recommendations"]), vec!["Loved by two", "Liked by three"]);
    assert_eq!(body["recommendations"][0]["myExcitement"], 5);

    let body: Value = server
        .post(&format!("/api/v1/rooms/{}/recommendations", room_id))
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .json(&json!({ "mode": "room", "typePreference": "movie", "genres": ["Comedy", "Drama"] }))
        .await
        .json();
    assert_eq!(titles(&body["recommendations"]), vec!["Loved by two"]);

    let (eve, _) = login_as(&server, "Eve").await;
    let response = server
        .post(&format!("/api/v1/rooms/{}/recommendations", room_id))
        .add_header(header::AUTHORIZATION, bearer(&eve))
        .json(&json!({ "mode": "room" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    response.assert_json(&json!({ "error": "Not a member of this room" }));
}

#[tokio::test]
async fn test_catalog_lookup() {
    let server = create_test_server();
    let (ana, _) = login_as(&server, "Ana").await;

    let response = server
        .get("/api/v1/catalog/search")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .add_query_param("query", "matrix")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["results"][0]["type"], "movie");
    assert_eq!(body["results"][1]["type"], "show");

    let body: Value = server
        .get("/api/v1/catalog/search")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .add_query_param("query", "matrix")
        .add_query_param("type", "tv")
        .await
        .json();
    assert_eq!(body["results"].as_array().unwrap().len(), 1);

    let response = server
        .get("/api/v1/catalog/search")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Query parameter is required" }));

    let response = server
        .get("/api/v1/catalog/details")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .add_query_param("id", "603")
        .add_query_param("type", "movie")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["runtimeMinutes"], 136);
    assert_eq!(body["posterUrl"], "https://img.test/m.jpg");

    server
        .get("/api/v1/catalog/details")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .add_query_param("id", "1")
        .add_query_param("type", "movie")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = server
        .get("/api/v1/catalog/details")
        .add_header(header::AUTHORIZATION, bearer(&ana))
        .add_query_param("id", "603")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "ID and type parameters are required" }));
}
