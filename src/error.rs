use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message shown when the catalog cannot be reached or answers with a failure status
pub const TRANSPORT_ERROR_MESSAGE: &str = "Failed to fetch movies. Please try again later.";

/// Message shown when the catalog answers but has nothing to show
pub const NO_RESULTS_MESSAGE: &str = "No movies found";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Trending store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("No results: {0}")]
    NoResults(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Network failures and non-success statuses, as opposed to a well-formed
    /// response that carries no movies
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::HttpClient(_) | AppError::ExternalApi(_))
    }

    /// Text the view shows in place of the result list
    pub fn user_message(&self) -> String {
        match self {
            AppError::NoResults(msg) if !msg.trim().is_empty() => msg.clone(),
            AppError::NoResults(_) => NO_RESULTS_MESSAGE.to_string(),
            _ => TRANSPORT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NoResults(_) => (StatusCode::NOT_FOUND, self.user_message()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Store(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_results_uses_upstream_message() {
        let err = AppError::NoResults("Movie not found!".to_string());
        assert_eq!(err.user_message(), "Movie not found!");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_no_results_falls_back_to_default() {
        let err = AppError::NoResults(String::new());
        assert_eq!(err.user_message(), NO_RESULTS_MESSAGE);
    }

    #[test]
    fn test_status_failure_is_transport() {
        let err = AppError::ExternalApi("status 401".to_string());
        assert!(err.is_transport());
        assert_eq!(err.user_message(), TRANSPORT_ERROR_MESSAGE);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::InvalidInput("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::ExternalApi("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
