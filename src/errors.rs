//! Errors for the SWAPI loader
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuration error")]
    ConfigError(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Record url has no numeric id: {0}")]
    InvalidRecordUrl(String),

    #[error("Persisting chunk {chunk} failed")]
    Persistence {
        chunk: usize,
        #[source]
        source: Box<LoaderError>,
    },

    #[error("Background task failed")]
    TaskJoin(#[from] tokio::task::JoinError),
}
