use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

mod search_state;
mod trending;

pub use search_state::SearchState;
pub use trending::{rank_entries, MovieSnapshot, TrendingEntry};

/// Poster shown when the catalog has no artwork for a movie
pub const PLACEHOLDER_POSTER: &str = "/no-movie.png";

/// Catalog identifier for a movie, unique within one result set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovieId {
    Numeric(u64),
    Text(String),
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieId::Numeric(id) => write!(f, "{}", id),
            MovieId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// A single movie as returned by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
}

impl Movie {
    /// Full poster URL, or the placeholder when the catalog has no poster
    pub fn poster_url(&self, image_base: &str) -> String {
        match self.poster_path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => format!(
                "{}/{}",
                image_base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => PLACEHOLDER_POSTER.to_string(),
        }
    }

}

// ============================================================================
// Catalog API Types
// ============================================================================

/// Raw response body from the discover and search endpoints
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub results: Option<Vec<serde_json::Value>>,
    /// Logical failure flag, either `"False"` or `false`
    #[serde(default, alias = "Response")]
    pub response: Option<serde_json::Value>,
    #[serde(default, rename = "Error")]
    pub error: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_message: Option<String>,
}

fn is_false_flag(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::String(s) => s.eq_ignore_ascii_case("false"),
        _ => false,
    }
}

impl CatalogResponse {
    /// Converts the payload into an ordered result set.
    ///
    /// A payload-level failure flag or an empty result list becomes
    /// `AppError::NoResults`, carrying the upstream message when one is present.
    /// Entries that do not parse as movies are skipped; order is preserved.
    pub fn into_movies(self) -> AppResult<Vec<Movie>> {
        if self.response.as_ref().is_some_and(is_false_flag) {
            return Err(AppError::NoResults(self.error.unwrap_or_default()));
        }
        if self.success == Some(false) {
            return Err(AppError::NoResults(self.status_message.unwrap_or_default()));
        }

        let movies: Vec<Movie> = self
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|result| serde_json::from_value::<Movie>(result).ok())
            .collect();

        if movies.is_empty() {
            return Err(AppError::NoResults(String::new()));
        }

        Ok(movies)
    }
}
