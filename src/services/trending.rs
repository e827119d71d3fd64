use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{db::TrendingStore, models::TrendingEntry};

/// Loads the most searched terms once per session
///
/// The list is read from the store on the first call to [`load`] and kept for
/// the lifetime of the controller; later searches do not refresh it. A failed
/// read is logged and leaves the list empty.
///
/// [`load`]: TrendingController::load
pub struct TrendingController {
    store: Arc<dyn TrendingStore>,
    limit: usize,
    entries: OnceCell<Vec<TrendingEntry>>,
}

impl TrendingController {
    pub fn new(store: Arc<dyn TrendingStore>, limit: usize) -> Self {
        Self {
            store,
            limit,
            entries: OnceCell::new(),
        }
    }

    /// Reads the top entries from the store. Only the first call hits the store.
    pub async fn load(&self) -> &[TrendingEntry] {
        self.entries
            .get_or_init(|| async {
                match self.store.top_n(self.limit).await {
                    Ok(entries) => {
                        tracing::info!(
                            entries = entries.len(),
                            store = self.store.name(),
                            "Trending searches loaded"
                        );
                        entries
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Error fetching trending movies");
                        Vec::new()
                    }
                }
            })
            .await
    }

    /// Loaded entries, empty until [`load`](TrendingController::load) completes
    pub fn entries(&self) -> &[TrendingEntry] {
        self.entries.get().map(Vec::as_slice).unwrap_or_default()
    }
}
