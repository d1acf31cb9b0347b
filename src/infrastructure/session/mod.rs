mod in_memory;
mod redis_store;

pub use in_memory::InMemorySessionStore;
pub use redis_store::RedisSessionStore;
