/// Movie catalog abstraction
///
/// The search flow only needs two reads from the catalog: the default popular
/// list and a search by free-text term. Both return the first page of results
/// in the catalog's own order. No retries and no caching happen at this layer.
use crate::{error::AppResult, models::Movie};

pub mod tmdb;

pub use tmdb::TmdbClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the default list, most popular first
    async fn discover_popular(&self) -> AppResult<Vec<Movie>>;

    /// Search movies by term
    ///
    /// The term is sent as typed, percent-encoded exactly once.
    async fn search_by_term(&self, term: &str) -> AppResult<Vec<Movie>>;

    /// Catalog name for logging and debugging
    fn name(&self) -> &'static str;
}
