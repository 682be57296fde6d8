// src/database.rs
mod models;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use tracing::{debug, error, info};

use crate::{
    config::DatabaseConfig,
    errors::LoaderError,
    models::FetchedPerson,
};

pub use models::PersonRow;

/// Destination for enriched people
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Store the found people of one batch, returning the number of rows
    /// written. Records without a url (not found) are skipped.
    async fn insert_batch(&self, records: Vec<FetchedPerson>) -> Result<u64, LoaderError>;
}

/// PostgreSQL storage for people
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open a connection pool and create the table if needed
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, LoaderError> {
        info!(
            "Connecting to database {} at {}:{} as {}",
            config.name, config.host, config.port, config.user
        );
        let pool = match PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.connect_options())
            .await
        {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to connect to database: {}", e);
                return Err(e.into());
            }
        };

        Self::new(pool).await
    }

    /// Wrap an existing pool, creating the table if needed
    pub async fn new(pool: PgPool) -> Result<Self, LoaderError> {
        Self::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    /// Create table `swapi`
    async fn create_tables(pool: &PgPool) -> Result<(), LoaderError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS swapi (
                id INTEGER PRIMARY KEY,
                birth_year VARCHAR,
                eye_color VARCHAR,
                films TEXT,
                gender VARCHAR,
                hair_color VARCHAR,
                height INTEGER NOT NULL DEFAULT 0,
                homeworld VARCHAR,
                mass INTEGER,
                name VARCHAR,
                skin_color VARCHAR,
                species TEXT,
                starships TEXT,
                vehicles TEXT
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Insert all found people in one transaction
    pub async fn insert_people(&self, records: &[FetchedPerson]) -> Result<u64, LoaderError> {
        let rows = rows_for(records)?;
        if rows.is_empty() {
            debug!("No people to insert");
            return Ok(0);
        }
        let count = rows.len();

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO swapi (
                id, birth_year, eye_color, films, gender, hair_color, height,
                homeworld, mass, name, skin_color, species, starships, vehicles
            ) ",
        );
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.id)
                .push_bind(row.birth_year)
                .push_bind(row.eye_color)
                .push_bind(row.films)
                .push_bind(row.gender)
                .push_bind(row.hair_color)
                .push_bind(row.height)
                .push_bind(row.homeworld)
                .push_bind(row.mass)
                .push_bind(row.name)
                .push_bind(row.skin_color)
                .push_bind(row.species)
                .push_bind(row.starships)
                .push_bind(row.vehicles);
        });

        // Rolled back on drop unless committed
        let mut tx = self.pool.begin().await?;
        let result = builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        info!("Inserted {} of {} people", result.rows_affected(), count);
        Ok(result.rows_affected())
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl RecordSink for Database {
    async fn insert_batch(&self, records: Vec<FetchedPerson>) -> Result<u64, LoaderError> {
        self.insert_people(&records).await
    }
}

/// Rows for every found person that carries its own url
fn rows_for(records: &[FetchedPerson]) -> Result<Vec<PersonRow>, LoaderError> {
    records
        .iter()
        .filter_map(|record| match record {
            FetchedPerson::Found(person) if person.url.is_some() => Some(person),
            _ => None,
        })
        .map(PersonRow::try_from)
        .collect()
}
