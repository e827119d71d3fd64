/// TMDB catalog client
///
/// API Flow:
/// 1. Discover: /discover/movie?sort_by=popularity.desc → default list
/// 2. Search: /search/movie?query={term} → results for a typed term
///
/// Every request carries the bearer token from configuration.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogResponse, Movie},
    services::catalog::CatalogClient,
};
use reqwest::{header::ACCEPT, Client as HttpClient, Request};
use tracing::instrument;

const DISCOVER_SORT: &str = "popularity.desc";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn discover_request(&self) -> AppResult<Request> {
        let url = format!("{}/discover/movie?sort_by={}", self.api_url, DISCOVER_SORT);
        self.build_request(&url)
    }

    fn search_request(&self, term: &str) -> AppResult<Request> {
        let url = format!(
            "{}/search/movie?query={}",
            self.api_url,
            urlencoding::encode(term)
        );
        self.build_request(&url)
    }

    fn build_request(&self, url: &str) -> AppResult<Request> {
        let request = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.api_key)
            .build()?;
        Ok(request)
    }

    async fn execute(&self, request: Request) -> AppResult<Vec<Movie>> {
        let response = self.http_client.execute(request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Catalog API returned status {}: {}",
                status, body
            )));
        }

        let payload: CatalogResponse = response.json().await?;
        payload.into_movies()
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    #[instrument(skip(self))]
    async fn discover_popular(&self) -> AppResult<Vec<Movie>> {
        let movies = self.execute(self.discover_request()?).await?;

        tracing::info!(results = movies.len(), provider = "tmdb", "Discover completed");

        Ok(movies)
    }

    #[instrument(skip(self))]
    async fn search_by_term(&self, term: &str) -> AppResult<Vec<Movie>> {
        if term.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let movies = self.execute(self.search_request(term)?).await?;

        tracing::info!(
            query = %term,
            results = movies.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
