//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);

    tracing::info!(
        "Starting Blog API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    #[cfg(feature = "rate-limit")]
    let limiter = {
        let limiter = std::sync::Arc::new(
            blog_infra::InMemoryRateLimiter::new(&config.rate_limit).map_err(std::io::Error::other)?,
        );
        spawn_limiter_pruning(limiter.clone(), config.rate_limit.window);
        limiter
    };

    HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
            .default_service(web::to(handlers::not_found));

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(middleware::rate_limit::RateLimitMiddleware::new(limiter.clone()));

        app.wrap(TracingLogger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// Periodically drop limiter state for idle clients.
#[cfg(feature = "rate-limit")]
fn spawn_limiter_pruning(
    limiter: std::sync::Arc<blog_infra::InMemoryRateLimiter>,
    every: std::time::Duration,
) {
    actix_rt::spawn(async move {
        let mut interval = actix_rt::time::interval(every);
        loop {
            interval.tick().await;
            limiter.prune();
        }
    });
}
