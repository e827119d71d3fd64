use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;

use crate::{
    db::TrendingStore,
    error::AppResult,
    models::{rank_entries, Movie, MovieSnapshot, TrendingEntry},
};

const DEFAULT_PREFIX: &str = "trending";

/// Extra terms read from the band tied at the N-th count, beyond `n`.
///
/// `top_n` never reads more than `n + 2 * TIE_MARGIN` snapshots. Within the
/// tied band the recency tie-break is exact for terms among the
/// `n + TIE_MARGIN` most recently searched ones.
const TIE_MARGIN: usize = 20;

/// Creates a Redis client for the trending store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Trending store persisted in Redis
///
/// Keys, under a common prefix:
/// - `{prefix}:counts`: sorted set, term scored by hit count
/// - `{prefix}:updated`: sorted set, term scored by last update (ms since epoch)
/// - `{prefix}:movie:{term}`: JSON snapshot of the representative movie
///
/// All three are written in one MULTI/EXEC block per recorded search.
#[derive(Clone)]
pub struct RedisTrendingStore {
    redis_client: Client,
    image_base: String,
    prefix: String,
}

impl RedisTrendingStore {
    pub fn new(redis_client: Client, image_base: String) -> Self {
        Self::with_prefix(redis_client, image_base, DEFAULT_PREFIX)
    }

    /// Store whose keys live under `prefix` instead of the default namespace
    pub fn with_prefix(redis_client: Client, image_base: String, prefix: &str) -> Self {
        Self {
            redis_client,
            image_base,
            prefix: prefix.to_string(),
        }
    }

    fn counts_key(&self) -> String {
        format!("{}:counts", self.prefix)
    }

    fn updated_key(&self) -> String {
        format!("{}:updated", self.prefix)
    }

    fn snapshot_key(&self, term: &str) -> String {
        format!("{}:movie:{}", self.prefix, term)
    }

    /// Terms tied at `threshold`, bounded to `window` from each source:
    /// the score band itself and the most recently searched terms.
    async fn tied_terms(
        &self,
        conn: &mut MultiplexedConnection,
        threshold: f64,
        window: usize,
    ) -> AppResult<Vec<String>> {
        let mut tied: Vec<String> = conn
            .zrevrangebyscore_limit(self.counts_key(), threshold, threshold, 0, window as isize)
            .await?;

        let recent: Vec<String> = conn
            .zrevrange(self.updated_key(), 0, window as isize - 1)
            .await?;
        if recent.is_empty() {
            return Ok(tied);
        }

        let mut pipe = redis::pipe();
        for term in &recent {
            pipe.zscore(self.counts_key(), term);
        }
        let counts: Vec<Option<f64>> = pipe.query_async(conn).await?;

        for (term, count) in recent.into_iter().zip(counts) {
            if count == Some(threshold) && !tied.contains(&term) {
                tied.push(term);
            }
        }

        Ok(tied)
    }

    /// Joins scored terms with their stored snapshots
    async fn load_entries(
        &self,
        conn: &mut MultiplexedConnection,
        scored: Vec<(String, f64)>,
    ) -> AppResult<Vec<TrendingEntry>> {
        if scored.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = scored.iter().map(|(term, _)| self.snapshot_key(term)).collect();
        let snapshots: Vec<Option<String>> = conn.mget(&keys).await?;

        let mut entries = Vec::with_capacity(scored.len());
        for ((term, score), snapshot) in scored.into_iter().zip(snapshots) {
            let Some(json) = snapshot else {
                tracing::warn!(term = %term, "Trending term has no stored movie, skipping");
                continue;
            };
            let movie: MovieSnapshot = serde_json::from_str(&json)?;
            entries.push(TrendingEntry {
                term,
                count: score as u64,
                movie,
            });
        }

        Ok(entries)
    }
}

#[async_trait::async_trait]
impl TrendingStore for RedisTrendingStore {
    async fn record(&self, term: &str, representative: &Movie) -> AppResult<u64> {
        let snapshot = MovieSnapshot::capture(representative, &self.image_base);
        let json = serde_json::to_string(&snapshot)?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let (count,): (f64,) = redis::pipe()
            .atomic()
            .zincr(self.counts_key(), term, 1)
            .zadd(self.updated_key(), term, snapshot.updated_at.timestamp_millis())
            .ignore()
            .set(self.snapshot_key(term), json)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(count as u64)
    }

    async fn top_n(&self, n: usize) -> AppResult<Vec<TrendingEntry>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let ranked: Vec<(String, f64)> = conn
            .zrevrange_withscores(self.counts_key(), 0, n as isize - 1)
            .await?;

        let Some(&(_, threshold)) = ranked.last() else {
            return Ok(Vec::new());
        };

        // Redis orders equal scores by member name, so the last places are
        // re-picked from the tied band by recency.
        let mut scored: Vec<(String, f64)> = ranked
            .into_iter()
            .filter(|(_, score)| *score > threshold)
            .collect();
        let tied = self.tied_terms(&mut conn, threshold, n + TIE_MARGIN).await?;
        scored.extend(tied.into_iter().map(|term| (term, threshold)));

        let mut entries = self.load_entries(&mut conn, scored).await?;
        rank_entries(&mut entries);
        entries.truncate(n);
        Ok(entries)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
