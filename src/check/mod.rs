//! Caching of link check results.

mod cache;
mod cached;

pub use cache::{CacheEntry, CacheKey, MemoryCache};
pub use cached::check_with_cache;
