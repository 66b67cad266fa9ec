//! Cache module for Redis-based credential caching
//!
//! Provides a Redis client with connection retry and a `TokenCache`
//! implementation that shares issued credentials across service instances.

pub mod redis_client;
pub mod redis_token_cache;


pub use redis_client::RedisClient;
pub use redis_token_cache::RedisTokenCache;

// Re-export commonly used types
pub use carnet_shared::config::CacheConfig;
