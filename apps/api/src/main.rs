//! Rolegrid API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod state;

use rolegrid_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StorageConfig, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{build_memory_state, build_postgres_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let app_state = match &config.storage {
        StorageConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = connect_and_migrate(database_url, *max_connections).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            build_postgres_state(pool, config.guard_scope.clone())
        }
        StorageConfig::Memory => build_memory_state(config.guard_scope.clone()).await?,
    };

    let app = build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        guard_scope = config.guard_scope.as_str(),
        "rolegrid-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
