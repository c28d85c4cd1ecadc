use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::auth::{password::PasswordHasher, token::TokenConfig};
use crate::config::AppConfig;
use crate::movie::repository::{InMemoryMovieRepository, PostgresMovieRepository};
use crate::reservation::repository::{
    InMemoryReservationRepository, PostgresReservationRepository,
};
use crate::shared::{AppError, AppState};
use crate::store::InMemoryStore;
use crate::user::repository::{InMemoryUserRepository, PostgresUserRepository};

/// Connects to Postgres and applies pending migrations
#[instrument(skip(config))]
pub async fn connect(config: &AppConfig, database_url: &str) -> Result<PgPool, AppError> {
    let mut options = PgConnectOptions::from_str(database_url).map_err(|e| {
        warn!(error = %e, "Invalid database URL");
        AppError::DatabaseError(e.to_string())
    })?;
    if !config.track_modifications {
        options = options.disable_statement_logging();
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_with(options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to connect to database");
            AppError::DatabaseError(e.to_string())
        })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to run database migrations");
            AppError::DatabaseError(e.to_string())
        })?;

    info!(
        max_connections = config.database_max_connections,
        "Database connected and migrated"
    );
    Ok(pool)
}

/// Builds application state on Postgres when a database URL is configured,
/// otherwise on in-memory repositories
pub async fn build_state(config: &AppConfig) -> Result<AppState, AppError> {
    let token_config = TokenConfig::from_config(config);
    let password_hasher = PasswordHasher::new(config.bcrypt_cost);

    let state = match &config.database_url {
        Some(url) => {
            let pool = connect(config, url).await?;
            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresMovieRepository::new(pool.clone())),
                Arc::new(PostgresReservationRepository::new(pool)),
                token_config,
                password_hasher,
            )
        }
        None => {
            warn!("No database URL configured, using in-memory repositories");
            let store = InMemoryStore::new();
            AppState::new(
                Arc::new(InMemoryUserRepository::with_store(store.clone())),
                Arc::new(InMemoryMovieRepository::with_store(store.clone())),
                Arc::new(InMemoryReservationRepository::with_store(store)),
                token_config,
                password_hasher,
            )
        }
    };

    Ok(state)
}
