use std::sync::Arc;

use movie_finder::{
    api::{create_router, AppState},
    config::Config,
    db::create_trending_store,
    services::{catalog::TmdbClient, SearchController, TrendingController},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_finder=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let trending_store = create_trending_store(&config)?;

    let search = Arc::new(SearchController::new(
        catalog,
        trending_store.clone(),
        config.debounce(),
    ));
    let trending = Arc::new(TrendingController::new(
        trending_store,
        config.trending_limit,
    ));

    // Default list before anything is typed
    search.fetch_now("");

    let loader = trending.clone();
    tokio::spawn(async move {
        loader.load().await;
    });

    let app = create_router(AppState::new(search, trending));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
