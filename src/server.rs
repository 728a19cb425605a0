//! Server assembly.
//!
//! Builds the collaborators (storage, OAuth provider, session signer,
//! metrics) once, then hands clones to every worker's `App`.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::config::Config;
use crate::handlers;
use crate::metrics::Metrics;
use crate::middleware::MetricsMiddleware;
use crate::services::{DynOAuthProvider, DynSessionSigner, GithubOAuth, JwtSessionSigner};
use crate::storage::{create_storage, DynStorage};
use crate::telemetry;

pub async fn run() -> std::io::Result<()> {
    let config = Config::from_env().unwrap_or_default();

    if let Err(err) = telemetry::init_telemetry("mentorship-portal-server") {
        eprintln!("telemetry init failed: {err}");
    }

    let storage: DynStorage = create_storage(&config.database.url)
        .await
        .map_err(std::io::Error::other)?;
    storage.init().await.map_err(std::io::Error::other)?;

    let oauth: DynOAuthProvider = Arc::new(GithubOAuth::new(&config.github));
    let signer: DynSessionSigner = Arc::new(JwtSessionSigner::new(
        config.jwt.secret.clone(),
        config.jwt.validity_hours,
    ));
    let metrics = Metrics::new().map_err(std::io::Error::other)?;

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "starting mentorship portal server"
    );

    let bind_addr = (config.server.host.clone(), config.server.port);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(MetricsMiddleware::new(metrics.clone()))
            // The portal frontend is served from a different origin.
            .wrap(Cors::permissive())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(oauth.clone()))
            .app_data(web::Data::new(signer.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .route("/oauth", web::post().to(handlers::auth::login))
            .route("/healthz", web::get().to(handlers::health::healthz))
            .route("/metrics", web::get().to(handlers::health::metrics))
    })
    .bind(bind_addr)?
    .run()
    .await
}
