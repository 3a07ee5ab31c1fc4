//! Database connection pool management

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{error, info};

use crate::config::Config;

/// Connection pools for the primary database and its binds
#[derive(Clone)]
pub struct Databases {
    /// Primary "shows" database
    pub shows: PgPool,
    /// "music_selections" bind
    pub music_selections: PgPool,
}

impl Databases {
    /// Connect both pools
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let shows = create_pool("shows", &config.database_url, config.db_max_connections).await?;
        let music_selections = create_pool(
            "music_selections",
            &config.music_selections_database_url,
            config.db_max_connections,
        )
        .await?;

        Ok(Self {
            shows,
            music_selections,
        })
    }

    /// Build pools without connecting; connections open on first use
    pub fn connect_lazy(config: &Config) -> Result<Self, sqlx::Error> {
        Ok(Self {
            shows: pool_options(config.db_max_connections).connect_lazy(&config.database_url)?,
            music_selections: pool_options(config.db_max_connections)
                .connect_lazy(&config.music_selections_database_url)?,
        })
    }
}

fn pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
}

/// Create a PostgreSQL connection pool
pub async fn create_pool(
    name: &str,
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to PostgreSQL ({})...", name);

    let pool = pool_options(max_connections).connect(database_url).await?;

    info!(
        "PostgreSQL pool '{}' created with max {} connections",
        name, max_connections
    );

    Ok(pool)
}

/// Run each database's migrations
pub async fn run_migrations(databases: &Databases) -> Result<(), MigrateError> {
    info!("Running database migrations...");

    migrate(sqlx::migrate!("./migrations/shows"), &databases.shows).await?;
    migrate(
        sqlx::migrate!("./migrations/music_selections"),
        &databases.music_selections,
    )
    .await?;

    info!("Database migrations completed");

    Ok(())
}

async fn migrate(mut migrator: Migrator, pool: &PgPool) -> Result<(), MigrateError> {
    // Both URLs may point at the same database; each migrator then sees the
    // other's applied versions.
    migrator.set_ignore_missing(true);
    migrator.run(pool).await
}

/// Health check for a database
pub async fn health_check(pool: &PgPool) -> bool {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            error!("Database health check failed: {}", e);
            false
        }
    }
}
