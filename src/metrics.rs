use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
};

/// Prometheus metrics for the portal, shared across workers.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_requests_by_route: IntCounterVec,
    pub http_request_duration_seconds: Histogram,
    pub http_request_duration_by_route: HistogramVec,
    /// Successful logins, labelled by role and `new`/`returning`.
    pub oauth_logins_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounter::with_opts(Opts::new(
            "http_requests_total",
            "Total number of HTTP requests",
        ))?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_requests_by_route = IntCounterVec::new(
            Opts::new(
                "http_requests_by_route",
                "HTTP requests by method, route and status",
            ),
            &["method", "route", "status"],
        )?;
        registry.register(Box::new(http_requests_by_route.clone()))?;

        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let http_request_duration_by_route = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_by_route",
                "HTTP request latency by method, route and status",
            ),
            &["method", "route", "status"],
        )?;
        registry.register(Box::new(http_request_duration_by_route.clone()))?;

        let oauth_logins_total = IntCounterVec::new(
            Opts::new("oauth_logins_total", "Completed OAuth logins"),
            &["role", "outcome"],
        )?;
        registry.register(Box::new(oauth_logins_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_requests_by_route,
            http_request_duration_seconds,
            http_request_duration_by_route,
            oauth_logins_total,
        })
    }

    /// Text exposition ("version=0.0.4") for the `/metrics` endpoint.
    pub fn encode_text(&self) -> Result<Vec<u8>, prometheus::Error> {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}
