use std::sync::Arc;

use crate::services::{SearchController, TrendingController};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchController>,
    pub trending: Arc<TrendingController>,
}

impl AppState {
    pub fn new(search: Arc<SearchController>, trending: Arc<TrendingController>) -> Self {
        Self { search, trending }
    }
}
