//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_answer_produced, record_cache_entries,
    record_cache_lookup, record_cache_store, record_http_request, PrometheusMetrics,
};
