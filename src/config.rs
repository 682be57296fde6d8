//! Application configuration

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::PgConnectOptions;

use crate::errors::LoaderError;

pub const DEFAULT_BASE_URL: &str = "https://swapi.py4e.com/api/people";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub pipeline: PipelineConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// People endpoint, without trailing slash
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub first_id: u32,
    pub last_id: u32,
    /// Number of records enriched concurrently, and persisted per batch
    pub chunk_size: usize,
}

/// PostgreSQL connection parameters, read from `POSTGRES_*` variables
#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    #[serde(rename = "db")]
    pub name: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub acquire_timeout: Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let loader = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("pipeline.first_id", 1)?
            .set_default("pipeline.last_id", 100)?
            .set_default("pipeline.chunk_size", 10)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("SWAPI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(Self {
            api: loader.get("api")?,
            pipeline: loader.get("pipeline")?,
            database: DatabaseConfig::load()?,
        })
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.api.base_url.trim().is_empty() {
            return Err(LoaderError::ConfigurationError {
                message: "API base url cannot be empty".to_string(),
            });
        }
        self.pipeline.validate()?;
        self.database.validate()
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.first_id == 0 {
            return Err(LoaderError::ConfigurationError {
                message: "First id must be at least 1".to_string(),
            });
        }
        if self.first_id > self.last_id {
            return Err(LoaderError::ConfigurationError {
                message: format!(
                    "First id {} is greater than last id {}",
                    self.first_id, self.last_id
                ),
            });
        }
        if self.chunk_size == 0 {
            return Err(LoaderError::ConfigurationError {
                message: "Chunk size must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("user", "user")?
            .set_default("password", "1234")?
            .set_default("db", "asyncio_swapi")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 5431)?
            .set_default("max_connections", 10)?
            .set_default("acquire_timeout", 30)?
            .add_source(Environment::with_prefix("POSTGRES").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.max_connections == 0 {
            return Err(LoaderError::ConfigurationError {
                message: "Max connections must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Connection options for the pool
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}
