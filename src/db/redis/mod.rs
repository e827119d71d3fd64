pub mod trending;

pub use trending::create_redis_client;
pub use trending::RedisTrendingStore;
