/// TMDB (The Movie Database) catalog provider
///
/// API Flow:
/// 1. Search: /search/movie and /search/tv, movies first
/// 2. Details: /movie/{id} or /tv/{id}
///
/// TMDB sometimes answers failures with a 200 and a `status_code` /
/// `status_message` body, so every payload is checked for that shape.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        catalog::{TmdbDetails, TmdbErrorBody, TmdbMovieResult, TmdbSearchPage, TmdbTvResult},
        CatalogDetails, CatalogKind, CatalogSearchResult, SearchScope,
    },
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 604800; // 1 week
const MIN_API_KEY_LEN: usize = 10;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, image_base: String, cache: Option<Cache>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base,
            cache,
        }
    }

    fn check_api_key(&self) -> AppResult<()> {
        if self.api_key.is_empty() {
            tracing::error!("TMDB API key not configured");
            return Err(AppError::Internal("TMDB API key not configured".to_string()));
        }
        if self.api_key.len() < MIN_API_KEY_LEN {
            tracing::error!(key_len = self.api_key.len(), "TMDB API key appears invalid");
            return Err(AppError::Internal("TMDB API key appears invalid".to_string()));
        }
        Ok(())
    }

    /// GET a TMDB path, returning the raw status and body
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> AppResult<(reqwest::StatusCode, String)> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(path, status = %status, body_len = body.len(), "TMDB response");
        Ok((status, body))
    }

    /// Decodes a search page, turning TMDB error bodies into `ExternalApi`
    fn decode_search<T: DeserializeOwned>(
        status: reqwest::StatusCode,
        body: &str,
    ) -> AppResult<Vec<T>> {
        let error: TmdbErrorBody = serde_json::from_str(body).unwrap_or_default();

        if !status.is_success() {
            return Err(AppError::ExternalApi(match error.status_message {
                Some(message) => format!("TMDB API Error: {}", message),
                None => format!("TMDB API returned status {}", status.as_u16()),
            }));
        }
        if error.is_error() {
            let message = error
                .status_message
                .unwrap_or_else(|| "Unknown TMDB error".to_string());
            return Err(AppError::ExternalApi(format!("TMDB API Error: {}", message)));
        }

        let page: TmdbSearchPage<T> = serde_json::from_str(body)
            .map_err(|e| AppError::ExternalApi(format!("Invalid TMDB search response: {}", e)))?;
        Ok(page.results)
    }

    async fn search_uncached(
        &self,
        query: &str,
        scope: SearchScope,
    ) -> AppResult<Vec<CatalogSearchResult>> {
        let params = [("query", query), ("page", "1")];
        let mut results = Vec::new();

        if scope.includes_movies() {
            let (status, body) = self.get("/search/movie", &params).await?;
            let movies: Vec<TmdbMovieResult> = Self::decode_search(status, &body)?;
            tracing::info!(query, count = movies.len(), "TMDB movie search");
            results.extend(movies.into_iter().map(CatalogSearchResult::from));
        }

        if scope.includes_tv() {
            let (status, body) = self.get("/search/tv", &params).await?;
            let shows: Vec<TmdbTvResult> = Self::decode_search(status, &body)?;
            tracing::info!(query, count = shows.len(), "TMDB TV search");
            results.extend(shows.into_iter().map(CatalogSearchResult::from));
        }

        Ok(results)
    }

    async fn details_uncached(&self, id: i64, kind: CatalogKind) -> AppResult<CatalogDetails> {
        let path = format!("/{}/{}", kind.path(), id);
        let (status, body) = self.get(&path, &[]).await?;

        let error: TmdbErrorBody = serde_json::from_str(&body).unwrap_or_default();
        if error.is_error() {
            tracing::warn!(id, status = %status, message = ?error.status_message, "TMDB details lookup failed");
            return Err(AppError::NotFound("TMDB item not found".to_string()));
        }
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}",
                status.as_u16()
            )));
        }

        let raw: TmdbDetails = serde_json::from_str(&body)
            .map_err(|e| AppError::ExternalApi(format!("Invalid TMDB details response: {}", e)))?;
        Ok(raw.into_details(kind, &self.image_base))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search(&self, query: &str, scope: SearchScope) -> AppResult<Vec<CatalogSearchResult>> {
        self.check_api_key()?;

        let key = CacheKey::CatalogSearch {
            scope,
            query: query.to_string(),
        };
        cached!(self.cache.as_ref(), key, SEARCH_CACHE_TTL, async {
            self.search_uncached(query, scope).await
        })
    }

    async fn details(&self, id: i64, kind: CatalogKind) -> AppResult<CatalogDetails> {
        self.check_api_key()?;

        let key = CacheKey::CatalogDetails { kind, id };
        cached!(self.cache.as_ref(), key, DETAILS_CACHE_TTL, async {
            self.details_uncached(id, kind).await
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
