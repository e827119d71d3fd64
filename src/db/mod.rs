use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    models::{Movie, TrendingEntry},
};

pub mod memory;
pub mod redis;

pub use self::memory::MemoryTrendingStore;
pub use self::redis::{create_redis_client, RedisTrendingStore};

/// Keyed counter of search terms
///
/// Every successful search increments the counter for its term and overwrites
/// the term's representative movie with the latest one seen. Reads return the
/// highest counters first; equal counts are ordered most recently updated first.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrendingStore: Send + Sync {
    /// Increments the counter for `term`, creating it at 1 on first use,
    /// and returns the new count.
    async fn record(&self, term: &str, representative: &Movie) -> AppResult<u64>;

    /// Returns up to `n` entries ordered by count descending
    async fn top_n(&self, n: usize) -> AppResult<Vec<TrendingEntry>>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Builds the trending store selected by configuration
pub fn create_trending_store(config: &Config) -> anyhow::Result<Arc<dyn TrendingStore>> {
    match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            tracing::info!("Using Redis trending store");
            Ok(Arc::new(RedisTrendingStore::new(
                client,
                config.tmdb_image_url.clone(),
            )))
        }
        None => {
            tracing::warn!("REDIS_URL not set, trending counts will not outlive this process");
            Ok(Arc::new(MemoryTrendingStore::new(
                config.tmdb_image_url.clone(),
            )))
        }
    }
}
