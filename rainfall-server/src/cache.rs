//! Per-station cache of lookup outcomes.
//!
//! Every outcome the gateway produces from an upstream response is cached,
//! errors included, so a station that is missing or failing upstream is not
//! re-queried until its entry expires.
//!
//! Expiry is a fixed time-to-live measured from insertion. There is no size
//! bound and no invalidation; entries are only replaced once they expire.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Outcome, StationId};

/// Default time-to-live for cached outcomes (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Cached outcome, shared between concurrent readers.
pub type CachedOutcome = Arc<Outcome>;

/// Configuration for the result cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries, the same for every station.
    pub ttl: Duration,
}

impl CacheConfig {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

/// Process-wide cache of outcomes keyed by station.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone)]
pub struct ResultCache {
    outcomes: MokaCache<StationId, CachedOutcome>,
}

impl ResultCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let outcomes = MokaCache::builder().time_to_live(config.ttl).build();

        Self { outcomes }
    }

    /// Get an unexpired outcome for a station.
    pub async fn get(&self, station: &StationId) -> Option<CachedOutcome> {
        self.outcomes.get(station).await
    }

    /// Insert or overwrite the outcome for a station.
    #[cfg(test)]
    pub(crate) async fn insert(&self, station: StationId, outcome: CachedOutcome) {
        self.outcomes.insert(station, outcome).await;
    }

    /// Return the cached outcome, or run `init` and cache what it yields.
    ///
    /// Concurrent callers missing on the same station wait for a single
    /// `init` to finish rather than each running their own. If `init`
    /// fails, nothing is cached and every waiter receives the same error.
    pub async fn get_or_try_insert_with<F, E>(
        &self,
        station: StationId,
        init: F,
    ) -> Result<CachedOutcome, Arc<E>>
    where
        F: Future<Output = Result<CachedOutcome, E>>,
        E: Send + Sync + 'static,
    {
        self.outcomes.try_get_with(station, init).await
    }
}
