//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, store selection, and the Axum
//! server lifecycle.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;

use crate::application::services::RedirectResolver;
use crate::config::Config;
use crate::domain::repositories::TrackerRepository;
use crate::infrastructure::persistence::{InMemoryTrackerRepository, PgTrackerRepository};
use crate::routes::app_router;
use crate::state::AppState;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the old-URL store (PostgreSQL pool + migrations, or in-memory)
/// - the redirect resolver
/// - the Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;

    let resolver = Arc::new(RedirectResolver::new(
        Arc::clone(&repository),
        config.append_slash,
    ));

    let state = AppState::new(repository, resolver);
    let app = app_router(state, config.component_enabled("redirects"));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_repository(config: &Config) -> Result<Arc<dyn TrackerRepository>> {
    if config.store_backend == "memory" {
        tracing::info!("Old-URL store: in-memory");
        return Ok(Arc::new(InMemoryTrackerRepository::new()));
    }

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres store")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate::Migrator::new(Path::new("./migrations"))
        .await?
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    tracing::info!("Old-URL store: PostgreSQL");
    Ok(Arc::new(PgTrackerRepository::new(Arc::new(pool))))
}
