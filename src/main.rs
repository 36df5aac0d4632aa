use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod state;

use crate::auth::repo::PgUserStore;
use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "authgate=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        issuer = %config.jwt.issuer,
        ttl_minutes = config.jwt.ttl_minutes,
        "configuration loaded"
    );

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let users = Arc::new(PgUserStore::new(db));
    let state = AppState::new(users, &config.jwt);

    app::serve(app::build_app(state)).await
}
