use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Movie, MovieId};

/// Display snippet captured from the first result of a search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSnapshot {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: String,
    pub updated_at: DateTime<Utc>,
}

impl MovieSnapshot {
    pub fn capture(movie: &Movie, image_base: &str) -> Self {
        Self {
            movie_id: movie.id.clone(),
            title: movie.title.clone(),
            poster_url: movie.poster_url(image_base),
            updated_at: Utc::now(),
        }
    }
}

/// A search term with its hit count and representative movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingEntry {
    /// Search term exactly as typed
    pub term: String,
    pub count: u64,
    pub movie: MovieSnapshot,
}

/// Orders by count descending, then most recently updated, then term.
pub fn rank_entries(entries: &mut [TrendingEntry]) {
    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.movie.updated_at.cmp(&a.movie.updated_at))
            .then_with(|| a.term.cmp(&b.term))
    });
}
