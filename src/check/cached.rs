use crate::{LinkTargetCache, UrlResponse};

/// Check a link target, consulting the [`LinkTargetCache`] first.
///
/// The `check` closure does the actual (usually expensive) work and is only
/// called when the cache has no live entry for this target. Its result is
/// stored before being returned.
///
/// # Examples
///
/// ```rust
/// use brofix::{check_with_cache, MemoryCache, UrlResponse};
///
/// let cache = MemoryCache::new();
/// let mut checks = 0;
///
/// for _ in 0..3 {
///     let got = check_with_cache(
///         &cache,
///         "https://example.com/",
///         "external",
///         || {
///             checks += 1;
///             UrlResponse::valid()
///         },
///     );
///     assert!(got.valid);
/// }
///
/// assert_eq!(checks, 1);
/// ```
pub fn check_with_cache<C, F>(
    cache: &C,
    link_target: &str,
    link_type: &str,
    check: F,
) -> UrlResponse
where
    C: LinkTargetCache + ?Sized,
    F: FnOnce() -> UrlResponse,
{
    if let Some(response) =
        cache.get_url_response_for_url(link_target, link_type, None)
    {
        log::debug!(
            "The cache has a result for \"{}\" ({})",
            link_target,
            link_type
        );
        return response;
    }

    log::debug!("Checking \"{}\" ({})", link_target, link_type);
    let response = check();
    cache.set_result(link_target, link_type, response.clone());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheEntry, CacheKey, ErrorParams, MemoryCache};
    use std::time::{Duration, SystemTime};

    #[test]
    fn stale_entries_are_checked_again() {
        let cache = MemoryCache::with_expire(Duration::from_secs(60));
        cache.insert(
            CacheKey::new("https://example.com/", "external"),
            CacheEntry::new(
                SystemTime::now() - Duration::from_secs(120),
                UrlResponse::valid(),
            ),
        );
        let broken = UrlResponse::invalid(
            ErrorParams::new("httpStatusCode").with_errno(410),
        );

        let got = check_with_cache(
            &cache,
            "https://example.com/",
            "external",
            || broken.clone(),
        );

        assert_eq!(got, broken);
        assert_eq!(
            cache.get_url_response_for_url(
                "https://example.com/",
                "external",
                None
            ),
            Some(broken)
        );
    }

    #[test]
    fn works_with_trait_objects() {
        let cache = MemoryCache::new();
        let dyn_cache: &dyn LinkTargetCache = &cache;

        check_with_cache(dyn_cache, "7", "db", UrlResponse::valid);

        assert!(cache.has_entry_for_url("7", "db", true, None));
    }
}
