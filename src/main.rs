//! SWAPI loader utility

use std::sync::Arc;
use std::time::Instant;

use swapi_loader::{
    config::AppConfig, database::Database, errors::LoaderError, http::ReqwestClient,
    pipeline::Pipeline,
};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), LoaderError> {
    let start = Instant::now();

    #[cfg(feature = "dotenv")]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Defaults, then config/default.*, then environment variables
    let config = AppConfig::load()?;
    config.validate()?;

    let client = ReqwestClient::new()?;
    let db = Arc::new(Database::connect(&config.database).await?);

    let pipeline = Pipeline::new(
        client,
        Arc::clone(&db),
        config.api.base_url.as_str(),
        config.pipeline.clone(),
    );
    let result = pipeline.run().await;

    db.close().await;

    match &result {
        Ok(summary) => info!("Load completed: {:?}", summary),
        Err(e) => error!("Load failed: {}", e),
    }
    info!("Elapsed {:?}", start.elapsed());

    result.map(|_| ())
}
