use crate::{LinkTargetCache, UrlResponse};
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, SystemTime},
};

/// An in-memory [`LinkTargetCache`].
///
/// All state lives behind a [`Mutex`] so the cache can be shared between
/// threads. The lock is only held for the duration of a single operation.
#[derive(Debug)]
pub struct MemoryCache {
    state: Mutex<State>,
}

#[derive(Debug, Clone, PartialEq)]
struct State {
    entries: HashMap<CacheKey, CacheEntry>,
    expire: Duration,
}

impl MemoryCache {
    /// How long entries stay live when nobody calls
    /// [`LinkTargetCache::set_expire()`].
    pub const DEFAULT_EXPIRE: Duration = Duration::from_secs(24 * 60 * 60);

    /// Create a new, empty [`MemoryCache`].
    pub fn new() -> Self { MemoryCache::with_expire(Self::DEFAULT_EXPIRE) }

    /// Create an empty [`MemoryCache`] with a particular default expiry.
    pub fn with_expire(expire: Duration) -> Self {
        MemoryCache {
            state: Mutex::new(State {
                entries: HashMap::new(),
                expire,
            }),
        }
    }

    /// The cache-wide default expiry.
    pub fn expire(&self) -> Duration { self.lock().expire }

    /// Add a pre-stamped [`CacheEntry`], replacing any previous entry for the
    /// same key.
    pub fn insert(&self, key: CacheKey, entry: CacheEntry) {
        self.lock().entries.insert(key, entry);
    }

    /// Lookup a particular [`CacheEntry`], regardless of whether it is stale.
    pub fn lookup(
        &self,
        link_target: &str,
        link_type: &str,
    ) -> Option<CacheEntry> {
        self.lock()
            .entries
            .get(&CacheKey::new(link_target, link_type))
            .cloned()
    }

    /// Get a copy of every [`CacheEntry`], regardless of whether it is stale.
    pub fn entries(&self) -> Vec<(CacheKey, CacheEntry)> {
        self.lock()
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    /// The number of entries, including stale ones.
    pub fn len(&self) -> usize { self.lock().entries.len() }

    /// Is the cache empty?
    pub fn is_empty(&self) -> bool { self.lock().entries.is_empty() }

    /// Drop every entry which is no longer live under the default expiry,
    /// returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut state = self.lock();
        let expire = state.expire;
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.is_live(expire));
        let removed = before - state.entries.len();

        if removed > 0 {
            log::debug!("Purged {} expired link target(s)", removed);
        }

        removed
    }

    /// Forget all [`CacheEntries`][CacheEntry].
    pub fn clear(&self) { self.lock().entries.clear(); }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live_entry(
        &self,
        link_target: &str,
        link_type: &str,
        expire: Option<Duration>,
    ) -> Option<CacheEntry> {
        let state = self.lock();
        let expire = expire.unwrap_or(state.expire);

        state
            .entries
            .get(&CacheKey::new(link_target, link_type))
            .filter(|entry| entry.is_live(expire))
            .cloned()
    }
}

impl Default for MemoryCache {
    fn default() -> Self { MemoryCache::new() }
}

impl LinkTargetCache for MemoryCache {
    fn set_expire(&self, expire: Duration) { self.lock().expire = expire; }

    fn has_entry_for_url(
        &self,
        link_target: &str,
        link_type: &str,
        use_expire: bool,
        expire: Option<Duration>,
    ) -> bool {
        if use_expire {
            self.live_entry(link_target, link_type, expire).is_some()
        } else {
            self.lock()
                .entries
                .contains_key(&CacheKey::new(link_target, link_type))
        }
    }

    fn get_url_response_for_url(
        &self,
        link_target: &str,
        link_type: &str,
        expire: Option<Duration>,
    ) -> Option<UrlResponse> {
        self.live_entry(link_target, link_type, expire)
            .map(|entry| entry.response)
    }

    fn set_result(
        &self,
        link_target: &str,
        link_type: &str,
        response: UrlResponse,
    ) {
        self.insert(
            CacheKey::new(link_target, link_type),
            CacheEntry::new(SystemTime::now(), response),
        );
    }

    fn remove(&self, link_target: &str, link_type: &str) {
        self.lock()
            .entries
            .remove(&CacheKey::new(link_target, link_type));
    }
}

impl Extend<(CacheKey, CacheEntry)> for MemoryCache {
    fn extend<T: IntoIterator<Item = (CacheKey, CacheEntry)>>(
        &mut self,
        iter: T,
    ) {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .extend(iter);
    }
}

/// The key a [`CacheEntry`] is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheKey {
    /// The URL or internal reference that was checked.
    pub link_target: String,
    /// The kind of link (`"external"`, `"db"`, `"file"`, ...).
    pub link_type: String,
}

impl CacheKey {
    /// Create a new [`CacheKey`].
    pub fn new<T, L>(link_target: T, link_type: L) -> Self
    where
        T: Into<String>,
        L: Into<String>,
    {
        CacheKey {
            link_target: link_target.into(),
            link_type: link_type.into(),
        }
    }
}

/// A timestamped [`UrlResponse`] used by the [`MemoryCache`] to keep track
/// of the last time a link target was checked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheEntry {
    /// When the [`CacheEntry`] was created.
    pub checked_at: SystemTime,
    /// What we found the last time the link target was checked.
    pub response: UrlResponse,
}

impl CacheEntry {
    /// Create a new [`CacheEntry`].
    pub const fn new(checked_at: SystemTime, response: UrlResponse) -> Self {
        CacheEntry {
            checked_at,
            response,
        }
    }

    /// Is this entry younger than `expire`?
    ///
    /// Entries stamped in the future (the clock went backwards) are never
    /// live.
    pub fn is_live(&self, expire: Duration) -> bool {
        match self.checked_at.elapsed() {
            Ok(age) => age < expire,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorParams;
    use pretty_assertions::assert_eq;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn stamped(age: Duration, response: UrlResponse) -> CacheEntry {
        CacheEntry::new(SystemTime::now() - age, response)
    }

    #[test]
    fn freshly_stored_results_can_be_retrieved() {
        let cache = MemoryCache::new();
        let response = UrlResponse::invalid(
            ErrorParams::new("httpStatusCode").with_errno(404),
        );

        cache.set_result("https://example.com/x", "external", response.clone());

        assert!(cache.has_entry_for_url(
            "https://example.com/x",
            "external",
            true,
            None
        ));
        assert_eq!(
            cache.get_url_response_for_url(
                "https://example.com/x",
                "external",
                None
            ),
            Some(response)
        );
    }

    #[test]
    fn the_link_type_is_part_of_the_key() {
        let cache = MemoryCache::new();

        cache.set_result("12", "db", UrlResponse::valid());

        assert!(cache.has_entry_for_url("12", "db", true, None));
        assert!(!cache.has_entry_for_url("12", "external", true, None));
    }

    #[test]
    fn entries_older_than_the_default_expiry_are_absent() {
        let cache = MemoryCache::with_expire(HOUR);
        cache.insert(
            CacheKey::new("https://example.com/", "external"),
            stamped(2 * HOUR, UrlResponse::valid()),
        );

        assert!(!cache.has_entry_for_url(
            "https://example.com/",
            "external",
            true,
            None
        ));
        assert_eq!(
            cache.get_url_response_for_url(
                "https://example.com/",
                "external",
                None
            ),
            None
        );
        // the stale entry is still there if we ignore expiry
        assert!(cache.has_entry_for_url(
            "https://example.com/",
            "external",
            false,
            None
        ));
    }

    #[test]
    fn a_per_call_expiry_overrides_the_default() {
        let cache = MemoryCache::with_expire(HOUR);
        cache.set_result(
            "https://example.com/",
            "external",
            UrlResponse::valid(),
        );

        assert!(cache.has_entry_for_url(
            "https://example.com/",
            "external",
            true,
            None
        ));
        assert!(!cache.has_entry_for_url(
            "https://example.com/",
            "external",
            true,
            Some(Duration::from_secs(0))
        ));
    }

    #[test]
    fn set_expire_changes_subsequent_lookups() {
        let cache = MemoryCache::new();
        cache.insert(
            CacheKey::new("https://example.com/", "external"),
            stamped(2 * HOUR, UrlResponse::valid()),
        );
        assert!(cache.has_entry_for_url(
            "https://example.com/",
            "external",
            true,
            None
        ));

        cache.set_expire(HOUR);

        assert_eq!(cache.expire(), HOUR);
        assert!(!cache.has_entry_for_url(
            "https://example.com/",
            "external",
            true,
            None
        ));
    }

    #[test]
    fn set_result_replaces_existing_entries() {
        let cache = MemoryCache::new();
        cache.insert(
            CacheKey::new("https://example.com/", "external"),
            stamped(
                2 * HOUR,
                UrlResponse::invalid(ErrorParams::new("exception")),
            ),
        );

        cache.set_result(
            "https://example.com/",
            "external",
            UrlResponse::valid(),
        );

        assert_eq!(cache.len(), 1);
        let entry = cache.lookup("https://example.com/", "external").unwrap();
        assert_eq!(entry.response, UrlResponse::valid());
        assert!(entry.is_live(HOUR));
    }

    #[test]
    fn removing_is_a_no_op_for_unknown_targets() {
        let cache = MemoryCache::new();
        cache.set_result(
            "https://example.com/",
            "external",
            UrlResponse::valid(),
        );

        cache.remove("https://example.com/other", "external");
        assert_eq!(cache.len(), 1);

        cache.remove("https://example.com/", "external");
        assert!(cache.is_empty());
    }

    #[test]
    fn lookup_and_entries_ignore_staleness() {
        let cache = MemoryCache::with_expire(HOUR);
        let key = CacheKey::new("https://old.example.com/", "external");
        let entry = stamped(2 * HOUR, UrlResponse::valid());
        cache.insert(key.clone(), entry.clone());

        assert_eq!(
            cache.lookup("https://old.example.com/", "external"),
            Some(entry.clone())
        );
        assert_eq!(cache.lookup("https://old.example.com/", "db"), None);
        assert_eq!(cache.entries(), vec![(key, entry)]);
    }

    #[test]
    fn purge_only_drops_stale_entries() {
        let mut cache = MemoryCache::with_expire(HOUR);
        cache.extend(vec![
            (
                CacheKey::new("https://old.example.com/", "external"),
                stamped(2 * HOUR, UrlResponse::valid()),
            ),
            (
                CacheKey::new("https://new.example.com/", "external"),
                stamped(Duration::from_secs(1), UrlResponse::valid()),
            ),
        ]);

        let removed = cache.purge_expired();

        assert_eq!(removed, 1);
        let keys: Vec<_> =
            cache.entries().into_iter().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            vec![CacheKey::new("https://new.example.com/", "external")]
        );
    }

    #[test]
    fn entries_from_the_future_are_never_live() {
        let entry = CacheEntry::new(
            SystemTime::now() + HOUR,
            UrlResponse::valid(),
        );

        assert!(!entry.is_live(MemoryCache::DEFAULT_EXPIRE));
    }
}
