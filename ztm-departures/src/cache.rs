//! Caching layer for departure boards.
//!
//! Timetables change rarely but every board costs one upstream request per
//! line, so finished boards are cached as JSON for a minute. A cached board
//! is served verbatim, `updated_at` included, so it may be up to one TTL
//! old.
//!
//! The key ignores line order: `lines=14,16` and `lines=16,14` share an
//! entry. Cache problems never fail a request; they degrade to a miss or a
//! skipped write.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;

use crate::board::{BoardError, BoardRequest, BoardResponse, DepartureBoard};
use crate::domain::Line;
use crate::ztm::ScheduleSource;

/// Cache key for one (stop, line set) combination.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a request.
    ///
    /// # Examples
    ///
    /// ```
    /// use ztm_departures::board::BoardRequest;
    /// use ztm_departures::cache::CacheKey;
    /// use ztm_departures::domain::{Line, StopRef};
    ///
    /// let a = BoardRequest::new(StopRef::new(7007, "01"), vec![Line::new(16), Line::new(14)]);
    /// let b = BoardRequest::new(StopRef::new(7007, "01"), vec![Line::new(14), Line::new(16)]);
    ///
    /// assert_eq!(CacheKey::for_request(&a), CacheKey::for_request(&b));
    /// assert_eq!(CacheKey::for_request(&a).as_str(), "schedule:7007:01:14,16");
    /// ```
    pub fn for_request(request: &BoardRequest) -> Self {
        let mut lines: Vec<Line> = request.lines.clone();
        lines.sort();
        lines.dedup();

        let lines = lines
            .iter()
            .map(Line::to_string)
            .collect::<Vec<_>>()
            .join(",");

        Self(format!(
            "schedule:{}:{}:{}",
            request.stop.id, request.stop.number, lines
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Key to JSON-blob store with a fixed TTL.
pub struct ResponseCache {
    boards: MokaCache<CacheKey, String>,
}

impl ResponseCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let boards = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { boards }
    }

    /// Read a board. Undecodable entries count as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<BoardResponse> {
        let blob = self.boards.get(key).await?;

        match serde_json::from_str(&blob) {
            Ok(board) => Some(board),
            Err(e) => {
                tracing::warn!(%key, error = %e, "discarding undecodable cache entry");
                self.boards.invalidate(key).await;
                None
            }
        }
    }

    /// Store a board, replacing any previous value for the key.
    pub async fn insert(&self, key: CacheKey, board: &BoardResponse) {
        match serde_json::to_string(board) {
            Ok(blob) => self.boards.insert(key, blob).await,
            Err(e) => tracing::warn!(%key, error = %e, "cannot encode board for cache"),
        }
    }

    #[cfg(test)]
    async fn insert_raw(&self, key: CacheKey, blob: String) {
        self.boards.insert(key, blob).await;
    }
}

/// Departure board with read-through caching.
///
/// Wraps a `DepartureBoard` and caches successful boards only.
pub struct CachedDepartureBoard<S> {
    board: DepartureBoard<S>,
    cache: ResponseCache,
}

impl<S: ScheduleSource> CachedDepartureBoard<S> {
    /// Create a new cached board.
    pub fn new(board: DepartureBoard<S>, cache_config: &CacheConfig) -> Self {
        Self {
            board,
            cache: ResponseCache::new(cache_config),
        }
    }

    /// Get a board, using the cache if available.
    pub async fn departures(
        &self,
        request: &BoardRequest,
        now: DateTime<Utc>,
    ) -> Result<BoardResponse, BoardError> {
        let key = CacheKey::for_request(request);

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(%key, "cache hit");
            return Ok(cached);
        }
        tracing::debug!(%key, "cache miss");

        let board = self.board.departures(request, now).await?;
        self.cache.insert(key, &board).await;

        Ok(board)
    }

    /// Access the underlying board for operations that bypass cache.
    pub fn board(&self) -> &DepartureBoard<S> {
        &self.board
    }

    /// Access the cache itself.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
