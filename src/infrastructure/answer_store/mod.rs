//! Answer store implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::{AnswerStoreBackend, AnswerStoreConfig, AnswerStoreFactory};
pub use in_memory::InMemoryAnswerStore;
pub use redis::{RedisAnswerStore, RedisAnswerStoreConfig};
