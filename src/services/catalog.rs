use crate::{
    error::{AppError, AppResult},
    models::{CatalogDetails, CatalogKind, CatalogSearchResult, SearchScope},
    services::providers::CatalogProvider,
};

/// Searches the configured catalog.
///
/// `scope` accepts `movie`, `tv` or `mixed`; absent means mixed and any other
/// value matches nothing.
pub async fn search_catalog(
    provider: &dyn CatalogProvider,
    query: Option<&str>,
    scope: Option<&str>,
) -> AppResult<Vec<CatalogSearchResult>> {
    let query = query.map(str::trim).filter(|q| !q.is_empty()).ok_or_else(|| {
        AppError::InvalidInput("Query parameter is required".to_string())
    })?;

    let scope = match scope {
        None => SearchScope::default(),
        Some(raw) => match raw.parse::<SearchScope>() {
            Ok(scope) => scope,
            Err(_) => {
                tracing::debug!(scope = raw, "Unknown catalog search type");
                return Ok(Vec::new());
            }
        },
    };

    let results = provider.search(query, scope).await?;
    tracing::info!(
        provider = provider.name(),
        query,
        ?scope,
        count = results.len(),
        "Catalog search"
    );
    Ok(results)
}

/// Metadata for one catalog title; `kind` is `movie` or anything else for TV
pub async fn catalog_details(
    provider: &dyn CatalogProvider,
    id: Option<&str>,
    kind: Option<&str>,
) -> AppResult<CatalogDetails> {
    let (Some(id), Some(kind)) = (
        id.map(str::trim).filter(|s| !s.is_empty()),
        kind.map(str::trim).filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::InvalidInput(
            "ID and type parameters are required".to_string(),
        ));
    };

    let id: i64 = id
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid catalog id: {}", id)))?;

    provider.details(id, CatalogKind::from_param(kind)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::MediaType, services::providers::MockCatalogProvider};
    use mockall::predicate::eq;

    fn hit(id: i64, title: &str) -> CatalogSearchResult {
        CatalogSearchResult {
            id,
            title: title.to_string(),
            release_date: None,
            poster_path: None,
            media_type: MediaType::Movie,
            overview: None,
        }
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_search().never();

        let err = search_catalog(&provider, Some("   "), None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Query parameter is required"));

        let err = search_catalog(&provider, None, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_search_defaults_to_mixed_and_trims() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_search()
            .with(eq("arrival"), eq(SearchScope::Mixed))
            .times(1)
            .returning(|_, _| Ok(vec![hit(329865, "Arrival")]));
        provider.expect_name().return_const("mock");

        let results = search_catalog(&provider, Some(" arrival "), None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 329865);
    }

    #[tokio::test]
    async fn test_search_unknown_scope_is_empty() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_search().never();

        let results = search_catalog(&provider, Some("arrival"), Some("podcast"))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_details_requires_both_params() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_details().never();

        for (id, kind) in [(None, Some("movie")), (Some("1"), None), (Some(""), Some("tv"))] {
            let err = catalog_details(&provider, id, kind).await.unwrap_err();
            assert!(
                matches!(err, AppError::InvalidInput(ref m) if m == "ID and type parameters are required")
            );
        }
    }

    #[tokio::test]
    async fn test_details_non_movie_type_is_tv() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_details()
            .with(eq(1396), eq(CatalogKind::Tv))
            .times(1)
            .returning(|id, kind| {
                Ok(CatalogDetails {
                    id,
                    title: "Breaking Bad".to_string(),
                    media_type: kind.media_type(),
                    overview: None,
                    poster_path: None,
                    poster_url: None,
                    genres: Vec::new(),
                    runtime_minutes: Some(47),
                    release_date: None,
                })
            });

        let details = catalog_details(&provider, Some("1396"), Some("show")).await.unwrap();
        assert_eq!(details.media_type, MediaType::Show);
    }

    #[tokio::test]
    async fn test_details_rejects_non_numeric_id() {
        let provider = MockCatalogProvider::new();
        let err = catalog_details(&provider, Some("abc"), Some("movie")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
