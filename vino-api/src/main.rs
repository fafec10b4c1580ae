use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vino_api::{app, AdminAuth, AppState};
use vino_core::SystemClock;
use vino_store::{app_config::Config, DbClient, PgProductRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vino_api=debug,vino_store=info,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config (is DATABASE_URL set?)")?;
    tracing::info!("Starting Vino API on port {}", config.server.port);

    // Postgres
    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let frontend_origin = config
        .cors
        .frontend_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .context("FRONTEND_ORIGIN is not a valid origin")?;
    match &frontend_origin {
        Some(origin) => tracing::info!("CORS restricted to {:?}", origin),
        None => tracing::info!("CORS allows any origin"),
    }

    if config.admin.token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set; admin routes will answer 403");
    }

    let app_state = AppState {
        products: Arc::new(PgProductRepository::new(db.pool.clone())),
        clock: Arc::new(SystemClock),
        admin: AdminAuth {
            token: config.admin.token.clone(),
        },
        frontend_origin,
    };

    let app = app(app_state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
