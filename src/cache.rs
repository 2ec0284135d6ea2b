use crate::{ErrorParams, UrlResponse};
use std::time::Duration;

/// A cache of link check results, used to avoid checking the same link
/// target over and over again.
///
/// Entries are keyed by the link target and its link type (`"external"`,
/// `"db"`, `"file"`, ...). Each entry is stamped with the time it was stored
/// and is only considered live while its age is less than the effective
/// expiry. The effective expiry is the per-call override when one is given,
/// otherwise the cache-wide default set by
/// [`LinkTargetCache::set_expire()`].
pub trait LinkTargetCache: Sync {
    /// Set the default staleness window for all subsequent lookups.
    fn set_expire(&self, expire: Duration);

    /// Build a normalized [`UrlResponse`].
    fn generate_url_response(
        &self,
        is_valid: bool,
        error_params: ErrorParams,
    ) -> UrlResponse {
        UrlResponse::new(is_valid, error_params)
    }

    /// Is there an entry for this link target?
    ///
    /// When `use_expire` is `true`, entries older than `expire` (or the
    /// cache-wide default when `expire` is `None`) are treated as missing.
    fn has_entry_for_url(
        &self,
        link_target: &str,
        link_type: &str,
        use_expire: bool,
        expire: Option<Duration>,
    ) -> bool;

    /// Get the stored result for a link target.
    ///
    /// Returns `None` when there is no entry or the entry has expired.
    fn get_url_response_for_url(
        &self,
        link_target: &str,
        link_type: &str,
        expire: Option<Duration>,
    ) -> Option<UrlResponse>;

    /// Insert or replace the result for a link target, stamping it with the
    /// current time.
    fn set_result(
        &self,
        link_target: &str,
        link_type: &str,
        response: UrlResponse,
    );

    /// Forget about a link target. Does nothing if it isn't in the cache.
    fn remove(&self, link_target: &str, link_type: &str);
}

impl<'c, C: LinkTargetCache> LinkTargetCache for &'c C {
    fn set_expire(&self, expire: Duration) { (**self).set_expire(expire) }

    fn has_entry_for_url(
        &self,
        link_target: &str,
        link_type: &str,
        use_expire: bool,
        expire: Option<Duration>,
    ) -> bool {
        (**self).has_entry_for_url(link_target, link_type, use_expire, expire)
    }

    fn get_url_response_for_url(
        &self,
        link_target: &str,
        link_type: &str,
        expire: Option<Duration>,
    ) -> Option<UrlResponse> {
        (**self).get_url_response_for_url(link_target, link_type, expire)
    }

    fn set_result(
        &self,
        link_target: &str,
        link_type: &str,
        response: UrlResponse,
    ) {
        (**self).set_result(link_target, link_type, response);
    }

    fn remove(&self, link_target: &str, link_type: &str) {
        (**self).remove(link_target, link_type);
    }
}
