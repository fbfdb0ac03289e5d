/// Read-through caching around an async computation.
///
/// Looks the key up in the cache and returns the hit. On a miss it awaits
/// `$block`, queues the value for a background write and returns it. A failed
/// cache read is logged and treated as a miss so the upstream still answers.
///
/// # Arguments
/// * `$cache`: an `Option<&Cache>`; `None` disables caching entirely.
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live for the stored value, in seconds.
/// * `$block`: a future yielding `AppResult<T>`, evaluated only on a miss.
///
/// # Example
/// ```rust,ignore
/// let results: Vec<CatalogSearchResult> = cached!(self.cache.as_ref(), key, SEARCH_CACHE_TTL, async {
///     self.search_uncached(query, scope).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let cache: Option<&$crate::db::Cache> = $cache;
        let key = $key;
        let hit = match cache {
            Some(cache) => match cache.get_from_cache(&key).await {
                Ok(hit) => hit,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, falling back to upstream");
                    None
                }
            },
            None => None,
        };

        match hit {
            Some(value) => Ok(value),
            None => match $block.await {
                Ok(value) => {
                    if let Some(cache) = cache {
                        cache.set_in_background(&key, &value, $ttl);
                    }
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
