pub mod catalog;
pub mod search;
pub mod trending;

pub use search::SearchController;
pub use trending::TrendingController;
