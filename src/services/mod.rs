pub mod redis;
pub mod search_cache;
