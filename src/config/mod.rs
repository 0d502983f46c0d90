//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, LogFormat, LoggingConfig, ProducerConfig, ServerConfig,
};
