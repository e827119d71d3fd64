use serde::Serialize;

use super::Movie;

/// Observable state behind the search box and result list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    /// Latest raw input, updated on every keystroke
    pub query: String,
    /// Query most recently committed after the debounce quiet period
    pub settled_query: Option<String>,
    pub loading: bool,
    pub error_message: Option<String>,
    /// Results of the latest applied fetch, in catalog order
    pub movies: Vec<Movie>,
}
