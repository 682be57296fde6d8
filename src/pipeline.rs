//! Chunked fetch, enrich and store pipeline

use std::ops::RangeInclusive;
use std::sync::Arc;

use futures::future::try_join_all;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{
    config::PipelineConfig,
    database::RecordSink,
    enrich::enrich_person,
    errors::LoaderError,
    http::HttpClient,
    models::FetchedPerson,
};

/// Counters for one pipeline run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub chunks: usize,
    pub requested: usize,
    pub found: usize,
    pub not_found: usize,
    pub rows_written: u64,
}

/// Split `ids` into consecutive chunks of `size`; only the last one may be
/// shorter.
///
/// # Panics
///
/// Panics if `size` is 0.
pub fn chunk_ids(ids: RangeInclusive<u32>, size: usize) -> Vec<Vec<u32>> {
    let ids: Vec<u32> = ids.collect();
    ids.chunks(size).map(<[u32]>::to_vec).collect()
}

type PersistTask = (usize, JoinHandle<Result<u64, LoaderError>>);

/// Enriches people chunk by chunk and hands every chunk to the sink in a
/// background task.
pub struct Pipeline<C, S> {
    client: C,
    sink: Arc<S>,
    base_url: String,
    config: PipelineConfig,
}

impl<C, S> Pipeline<C, S>
where
    C: HttpClient,
    S: RecordSink + 'static,
{
    pub fn new(
        client: C,
        sink: Arc<S>,
        base_url: impl Into<String>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            client,
            sink,
            base_url: base_url.into(),
            config,
        }
    }

    /// Process the whole id range.
    ///
    /// Chunks are enriched one after another, every id of a chunk
    /// concurrently. Storing a chunk does not hold up enrichment of the
    /// next one; all stores are awaited before returning. An enrichment
    /// error stops scheduling further chunks. A store error is reported
    /// once every store has finished.
    pub async fn run(&self) -> Result<RunSummary, LoaderError> {
        self.config.validate()?;
        let chunks = chunk_ids(
            self.config.first_id..=self.config.last_id,
            self.config.chunk_size,
        );
        info!(
            "Loading people {}..={} in {} chunks of up to {}",
            self.config.first_id,
            self.config.last_id,
            chunks.len(),
            self.config.chunk_size
        );

        let mut summary = RunSummary::default();
        let mut persisting: Vec<PersistTask> = Vec::with_capacity(chunks.len());
        let mut enriched = Ok(());

        for (chunk, ids) in chunks.into_iter().enumerate() {
            let people = match self.enrich_chunk(&ids).await {
                Ok(people) => people,
                Err(e) => {
                    error!(chunk, "Enriching chunk failed: {}", e);
                    enriched = Err(e);
                    break;
                }
            };

            let found = people.iter().filter(|person| person.is_found()).count();
            info!(chunk, found, requested = ids.len(), "Chunk enriched");
            summary.chunks += 1;
            summary.requested += ids.len();
            summary.found += found;
            summary.not_found += ids.len() - found;

            let sink = Arc::clone(&self.sink);
            let handle = tokio::spawn(async move { sink.insert_batch(people).await });
            persisting.push((chunk, handle));
        }

        let persisted = Self::join_persistence(persisting, &mut summary).await;
        enriched?;
        persisted?;

        Ok(summary)
    }

    async fn enrich_chunk(&self, ids: &[u32]) -> Result<Vec<FetchedPerson>, LoaderError> {
        try_join_all(ids.iter().map(|&id| enrich_person(id, &self.client, &self.base_url))).await
    }

    /// Wait for every store task, keeping the first failure
    async fn join_persistence(
        tasks: Vec<PersistTask>,
        summary: &mut RunSummary,
    ) -> Result<(), LoaderError> {
        let mut failure = None;

        for (chunk, handle) in tasks {
            let err = match handle.await {
                Ok(Ok(rows)) => {
                    info!(chunk, rows, "Chunk stored");
                    summary.rows_written += rows;
                    continue;
                }
                Ok(Err(e)) => {
                    error!(chunk, "Storing chunk failed: {}", e);
                    LoaderError::Persistence {
                        chunk,
                        source: Box::new(e),
                    }
                }
                Err(e) => {
                    error!(chunk, "Store task did not finish: {}", e);
                    LoaderError::TaskJoin(e)
                }
            };
            if failure.is_none() {
                failure = Some(err);
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
