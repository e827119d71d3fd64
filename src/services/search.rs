use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::{
    db::TrendingStore,
    error::AppError,
    models::{Movie, SearchState},
    services::catalog::CatalogClient,
};

/// Owns the search box state and turns keystrokes into catalog fetches
///
/// Raw input is published immediately. A background task debounces it: each new
/// query restarts the quiet period, and only when the period elapses is the text
/// committed as the settled query and fetched.
///
/// Every fetch is tagged with a sequence number when dispatched. Its outcome is
/// applied only if no later fetch has been dispatched since, so the visible
/// results always belong to the latest settled query even when responses
/// arrive out of order.
pub struct SearchController {
    query_tx: mpsc::UnboundedSender<String>,
    fetcher: Fetcher,
}

/// State shared between the controller, the debounce task and in-flight fetches
#[derive(Clone)]
struct Fetcher {
    catalog: Arc<dyn CatalogClient>,
    trending: Arc<dyn TrendingStore>,
    state: Arc<watch::Sender<SearchState>>,
    issued: Arc<AtomicU64>,
}

/// Clears the loading flag when a fetch ends, however it ends
struct LoadingGuard {
    state: Arc<watch::Sender<SearchState>>,
    issued: Arc<AtomicU64>,
    seq: u64,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if self.issued.load(Ordering::SeqCst) != self.seq || !s.loading {
                return false;
            }
            s.loading = false;
            true
        });
    }
}

impl SearchController {
    /// Creates the controller and spawns its debounce task.
    ///
    /// Must be called from within a Tokio runtime. The task stops when the
    /// controller is dropped.
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        trending: Arc<dyn TrendingStore>,
        debounce: Duration,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        let (query_tx, query_rx) = mpsc::unbounded_channel();

        let fetcher = Fetcher {
            catalog,
            trending,
            state: Arc::new(state),
            issued: Arc::new(AtomicU64::new(0)),
        };

        let worker = fetcher.clone();
        tokio::spawn(async move {
            Self::debounce_task(worker, debounce, query_rx).await;
        });

        Self { query_tx, fetcher }
    }

    /// Records the latest raw input and restarts the debounce period
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.fetcher.state.send_if_modified(|s| {
            if s.query == text {
                return false;
            }
            s.query = text.clone();
            true
        });

        if let Err(e) = self.query_tx.send(text) {
            tracing::error!(error = %e, "Search debounce task is not running");
        }
    }

    /// Fetches `query` right away, bypassing the debounce period.
    ///
    /// Used once at startup to show the default list before anything is typed.
    pub fn fetch_now(&self, query: impl Into<String>) {
        self.fetcher.dispatch(query.into());
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.fetcher.state.subscribe()
    }

    /// Current state
    pub fn snapshot(&self) -> SearchState {
        self.fetcher.state.borrow().clone()
    }

    /// Background task that coalesces queries into settled fetches
    ///
    /// Holds at most one pending query. A new query replaces it and pushes the
    /// deadline out; when the deadline passes the pending query is dispatched.
    async fn debounce_task(
        fetcher: Fetcher,
        delay: Duration,
        mut query_rx: mpsc::UnboundedReceiver<String>,
    ) {
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Search debounce task started");
        let mut pending: Option<String> = None;
        let timer = tokio::time::sleep(delay);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                received = query_rx.recv() => match received {
                    Some(text) => {
                        pending = Some(text);
                        timer.as_mut().reset(Instant::now() + delay);
                    }
                    None => break,
                },
                _ = &mut timer, if pending.is_some() => {
                    if let Some(settled) = pending.take() {
                        fetcher.dispatch(settled);
                    }
                }
            }
        }

        tracing::debug!("Search debounce task stopped");
    }
}

impl Fetcher {
    /// Marks a fetch as started and runs it on its own task
    fn dispatch(&self, settled: String) {
        let mut seq = 0;
        self.state.send_modify(|s| {
            seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            s.settled_query = Some(settled.clone());
            s.loading = true;
            s.error_message = None;
        });

        let fetcher = self.clone();
        tokio::spawn(async move {
            fetcher.fetch(seq, settled).await;
        });
    }

    async fn fetch(self, seq: u64, settled: String) {
        let _guard = LoadingGuard {
            state: self.state.clone(),
            issued: self.issued.clone(),
            seq,
        };

        let provider = self.catalog.name();
        let is_search = !settled.trim().is_empty();
        let outcome = if is_search {
            self.catalog.search_by_term(&settled).await
        } else {
            self.catalog.discover_popular().await
        };

        match &outcome {
            Ok(movies) => {
                tracing::debug!(seq, provider, query = %settled, results = movies.len(), "Fetch completed");
                if let (true, Some(first)) = (is_search, movies.first()) {
                    self.record_in_background(settled.clone(), first.clone());
                }
            }
            Err(e) if e.is_transport() => {
                tracing::error!(error = %e, provider, query = %settled, "Error fetching movies");
            }
            Err(e) => {
                tracing::info!(error = %e, provider, query = %settled, "Catalog returned no movies");
            }
        }

        let applied = self.state.send_if_modified(|s| {
            if self.issued.load(Ordering::SeqCst) != seq {
                return false;
            }
            Self::apply(s, outcome);
            true
        });

        if !applied {
            tracing::debug!(seq, query = %settled, "Discarding response for superseded query");
        }
    }

    fn apply(state: &mut SearchState, outcome: Result<Vec<Movie>, AppError>) {
        match outcome {
            Ok(movies) => {
                state.movies = movies;
                state.error_message = None;
            }
            Err(e) => {
                state.movies.clear();
                state.error_message = Some(e.user_message());
            }
        }
        state.loading = false;
    }

    /// Counts the search in the trending store without waiting for it
    fn record_in_background(&self, term: String, representative: Movie) {
        let trending = self.trending.clone();
        tokio::spawn(async move {
            match trending.record(&term, &representative).await {
                Ok(count) => {
                    tracing::debug!(term = %term, count, "Search term recorded");
                }
                Err(e) => {
                    tracing::error!(error = %e, term = %term, "Failed to record search term");
                }
            }
        });
    }
}
