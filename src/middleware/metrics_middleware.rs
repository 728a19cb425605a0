use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

use crate::metrics::Metrics;

/// Records request counts and latency per method/route/status.
pub struct MetricsMiddleware {
    metrics: Metrics,
}

impl MetricsMiddleware {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsService {
            inner: Rc::new(service),
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct MetricsService<S> {
    inner: Rc<S>,
    metrics: Metrics,
}

impl<S, B> Service<ServiceRequest> for MetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let metrics = self.metrics.clone();
        let inner = self.inner.clone();
        let method = req.method().as_str().to_string();
        let started = Instant::now();

        Box::pin(async move {
            metrics.http_requests_total.inc();

            let res = inner.call(req).await?;

            // Prefer the matched route pattern over the raw path to keep
            // label cardinality bounded.
            let route = res
                .request()
                .match_pattern()
                .unwrap_or_else(|| res.request().path().to_string());
            let status = res.status().as_u16().to_string();
            let elapsed = started.elapsed().as_secs_f64();

            metrics.http_request_duration_seconds.observe(elapsed);
            metrics
                .http_requests_by_route
                .with_label_values(&[&method, &route, &status])
                .inc();
            metrics
                .http_request_duration_by_route
                .with_label_values(&[&method, &route, &status])
                .observe(elapsed);

            Ok(res)
        })
    }
}
