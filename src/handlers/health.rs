//! Liveness and metrics endpoints.

use actix_web::{web, HttpResponse};

use crate::metrics::Metrics;
use crate::storage::DynStorage;

/// `GET /healthz`
pub async fn healthz(storage: web::Data<DynStorage>) -> HttpResponse {
    match storage.healthcheck().await {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body("OK"),
        Err(err) => {
            tracing::error!(error = %err, "healthcheck failed");
            HttpResponse::ServiceUnavailable()
                .content_type("text/plain; charset=utf-8")
                .body("database unavailable")
        }
    }
}

/// `GET /metrics`
pub async fn metrics(metrics: web::Data<Metrics>) -> HttpResponse {
    match metrics.encode_text() {
        Ok(buffer) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(buffer),
        Err(err) => {
            tracing::error!(error = %err, "metrics encoding failed");
            HttpResponse::InternalServerError().finish()
        }
    }
}
