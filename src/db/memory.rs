use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    db::TrendingStore,
    error::AppResult,
    models::{rank_entries, Movie, MovieSnapshot, TrendingEntry},
};

/// Trending store held in process memory
pub struct MemoryTrendingStore {
    entries: RwLock<HashMap<String, TrendingEntry>>,
    image_base: String,
}

impl MemoryTrendingStore {
    pub fn new(image_base: String) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            image_base,
        }
    }
}

#[async_trait::async_trait]
impl TrendingStore for MemoryTrendingStore {
    async fn record(&self, term: &str, representative: &Movie) -> AppResult<u64> {
        let snapshot = MovieSnapshot::capture(representative, &self.image_base);
        let mut entries = self.entries.write().await;

        let entry = entries
            .entry(term.to_string())
            .and_modify(|e| {
                e.count += 1;
                e.movie = snapshot.clone();
            })
            .or_insert_with(|| TrendingEntry {
                term: term.to_string(),
                count: 1,
                movie: snapshot,
            });

        Ok(entry.count)
    }

    async fn top_n(&self, n: usize) -> AppResult<Vec<TrendingEntry>> {
        let entries = self.entries.read().await;
        let mut ranked: Vec<TrendingEntry> = entries.values().cloned().collect();
        rank_entries(&mut ranked);
        ranked.truncate(n);
        Ok(ranked)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovieId;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn movie(id: u64, title: &str, poster: &str) -> Movie {
        Movie {
            id: MovieId::Numeric(id),
            title: title.to_string(),
            poster_path: Some(poster.to_string()),
            vote_average: None,
            release_date: None,
            original_language: None,
        }
    }

    #[tokio::test]
    async fn test_record_twice_increments_and_overwrites_snapshot() {
        let store = MemoryTrendingStore::new(IMAGE_BASE.to_string());

        let first = store.record("batman", &movie(1, "Batman", "/p.jpg")).await.unwrap();
        let second = store
            .record("batman", &movie(2, "Batman Returns", "/q.jpg"))
            .await
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let top = store.top_n(5).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].term, "batman");
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].movie.movie_id, MovieId::Numeric(2));
        assert_eq!(top[0].movie.title, "Batman Returns");
        assert_eq!(top[0].movie.poster_url, format!("{}/q.jpg", IMAGE_BASE));
    }

    #[tokio::test]
    async fn test_terms_are_case_sensitive() {
        let store = MemoryTrendingStore::new(IMAGE_BASE.to_string());
        store.record("Batman", &movie(1, "Batman", "/p.jpg")).await.unwrap();
        store.record("batman", &movie(1, "Batman", "/p.jpg")).await.unwrap();

        let top = store.top_n(5).await.unwrap();
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|e| e.count == 1));
    }

    #[tokio::test]
    async fn test_top_n_orders_and_bounds() {
        let store = MemoryTrendingStore::new(IMAGE_BASE.to_string());
        let hits = [("alien", 1), ("dune", 4), ("heat", 2), ("jaws", 3)];
        for (term, count) in hits {
            for _ in 0..count {
                store.record(term, &movie(1, term, "/x.jpg")).await.unwrap();
            }
        }

        let top = store.top_n(3).await.unwrap();
        let terms: Vec<&str> = top.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["dune", "jaws", "heat"]);

        assert!(store.top_n(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_top_n_empty_store() {
        let store = MemoryTrendingStore::new(IMAGE_BASE.to_string());
        assert!(store.top_n(5).await.unwrap().is_empty());
    }
}
