pub mod metrics_middleware;

pub use metrics_middleware::MetricsMiddleware;
