use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rolegrid_core::{AppError, GuardScope};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageConfig,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub guard_scope: GuardScope,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let guard_scope = match env::var("ADMIN_GUARD_SCOPE") {
            Ok(value) => GuardScope::new(value)?,
            Err(_) => GuardScope::admin(),
        };

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_owned())
            .as_str()
        {
            "postgres" => StorageConfig::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .map(|value| {
                        value.parse::<u32>().map_err(|error| {
                            AppError::Validation(format!(
                                "invalid DATABASE_MAX_CONNECTIONS: {error}"
                            ))
                        })
                    })
                    .transpose()?
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            },
            "memory" => StorageConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        if migrate_only && storage == StorageConfig::Memory {
            return Err(AppError::Validation(
                "the migrate command requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        }

        Ok(Self {
            migrate_only,
            storage,
            frontend_url,
            api_host,
            api_port,
            guard_scope,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, StorageConfig};

    #[test]
    fn socket_address_rejects_invalid_host() {
        let config = ApiConfig {
            migrate_only: false,
            storage: StorageConfig::Memory,
            frontend_url: "http://localhost:3000".to_owned(),
            api_host: "not-an-ip".to_owned(),
            api_port: 3001,
            guard_scope: rolegrid_core::GuardScope::admin(),
        };

        assert!(config.socket_address().is_err());
    }

    #[test]
    fn socket_address_combines_host_and_port() {
        let config = ApiConfig {
            migrate_only: false,
            storage: StorageConfig::Memory,
            frontend_url: "http://localhost:3000".to_owned(),
            api_host: "0.0.0.0".to_owned(),
            api_port: 8080,
            guard_scope: rolegrid_core::GuardScope::admin(),
        };

        assert_eq!(
            config.socket_address().map(|address| address.to_string()).ok(),
            Some("0.0.0.0:8080".to_owned())
        );
    }
}
