use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::MediaType;

/// Which catalog sections a search covers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Movie,
    Tv,
    #[default]
    Mixed,
}

impl SearchScope {
    pub fn includes_movies(self) -> bool {
        matches!(self, SearchScope::Movie | SearchScope::Mixed)
    }

    pub fn includes_tv(self) -> bool {
        matches!(self, SearchScope::Tv | SearchScope::Mixed)
    }
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(SearchScope::Movie),
            "tv" => Ok(SearchScope::Tv),
            "mixed" => Ok(SearchScope::Mixed),
            _ => Err(format!("Unknown search type: {}", s)),
        }
    }
}

/// Catalog section a single id lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Movie,
    Tv,
}

impl CatalogKind {
    /// Anything other than `movie` is looked up as TV
    pub fn from_param(s: &str) -> Self {
        if s == "movie" {
            CatalogKind::Movie
        } else {
            CatalogKind::Tv
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            CatalogKind::Movie => "movie",
            CatalogKind::Tv => "tv",
        }
    }

    pub fn media_type(self) -> MediaType {
        match self {
            CatalogKind::Movie => MediaType::Movie,
            CatalogKind::Tv => MediaType::Show,
        }
    }
}

/// One hit of a catalog search, returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSearchResult {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub overview: Option<String>,
}

/// Full metadata for one catalog entry, returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDetails {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub poster_url: Option<String>,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<i32>,
    pub release_date: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// TMDB reports failures as this body, sometimes with a 200 status
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TmdbErrorBody {
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl TmdbErrorBody {
    pub fn is_error(&self) -> bool {
        self.status_code.is_some() || self.status_message.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieResult {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvResult {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl From<TmdbMovieResult> for CatalogSearchResult {
    fn from(movie: TmdbMovieResult) -> Self {
        CatalogSearchResult {
            id: movie.id,
            title: movie.title,
            release_date: movie.release_date,
            poster_path: movie.poster_path,
            media_type: MediaType::Movie,
            overview: movie.overview,
        }
    }
}

impl From<TmdbTvResult> for CatalogSearchResult {
    fn from(show: TmdbTvResult) -> Self {
        CatalogSearchResult {
            id: show.id,
            title: show.name,
            release_date: show.first_air_date,
            poster_path: show.poster_path,
            media_type: MediaType::Show,
            overview: show.overview,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

/// Union of the movie and TV detail payloads; only the fields we read
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub episode_run_time: Vec<i32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl TmdbDetails {
    pub fn into_details(self, kind: CatalogKind, image_base: &str) -> CatalogDetails {
        let poster_url = self
            .poster_path
            .as_ref()
            .map(|path| format!("{}{}", image_base, path));

        let (title, runtime_minutes, release_date) = match kind {
            CatalogKind::Movie => (self.title, self.runtime, self.release_date),
            CatalogKind::Tv => (
                self.name,
                self.episode_run_time.first().copied(),
                self.first_air_date,
            ),
        };

        CatalogDetails {
            id: self.id,
            title: title.unwrap_or_default(),
            media_type: kind.media_type(),
            overview: self.overview,
            poster_path: self.poster_path,
            poster_url,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            runtime_minutes,
            release_date,
        }
    }
}
