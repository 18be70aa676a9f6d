//! Pipeline orchestrator - coordinates all components.
//!
//! Supports both the remote HTTP store and a mock store via feature flags.
//! When the `remote` feature is disabled, runs against the mock store.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{
    MemoryHandle, MemoryStore, ProgressCallback, ProgressEvent, SessionBlueprint, TextRecord,
};
use dispatcher::BatchDispatcher;
use ingestion::{DirectorySource, RecordSource};
use memstore::{MemorySession, MockMemoryStore};
use observability::SessionMetricsAggregator;
use tracing::{debug, info};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The session blueprint configuration
    pub blueprint: SessionBlueprint,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Force the in-process mock store
    pub use_mock_store: bool,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    pub async fn run(self) -> Result<PipelineStats> {
        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        #[cfg(feature = "remote")]
        if !self.config.use_mock_store {
            let store = Arc::new(memstore::HttpMemoryStore::from_config(
                &self.config.blueprint.store,
            ));
            info!(
                endpoint = %self.config.blueprint.store.endpoint,
                "Using remote memory store"
            );
            return self.run_with_store(store).await;
        }

        #[cfg(not(feature = "remote"))]
        if !self.config.use_mock_store {
            tracing::warn!("Built without the 'remote' feature, falling back to the mock store");
        }

        info!("Using in-process mock store");
        self.run_with_store(Arc::new(MockMemoryStore::new("mock-memory")))
            .await
    }

    /// Run the pipeline against a concrete store
    async fn run_with_store<S>(self, store: Arc<S>) -> Result<PipelineStats>
    where
        S: MemoryStore + Send + Sync + 'static,
    {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;
        let budget = blueprint.session.max_tokens;

        // Collect records from all sources
        let mut records = Vec::new();
        for source_config in &blueprint.sources {
            let source = DirectorySource::from_config(source_config);
            let collected = source
                .collect()
                .with_context(|| format!("Failed to collect source '{}'", source_config.id))?;

            info!(
                source = %source_config.id,
                records = collected.len(),
                "Source collected"
            );
            observability::record_records_ingested(&source_config.id, collected.len());
            records.extend(collected);
        }

        if records.is_empty() {
            anyhow::bail!("No records collected from any source");
        }
        let originals = records.clone();

        // Token counter for the configured encoding
        let counter = segmenter::counter_for(&blueprint.session.encoding)?;

        // Establish the memory session
        let mut session = match &blueprint.store.memory_id {
            Some(id) => MemorySession::with_handle(Arc::clone(&store), MemoryHandle::new(id)),
            None => MemorySession::new(Arc::clone(&store)),
        };
        let creating = !session.is_initialized();
        let handle = session.ensure_initialized().await?.clone();
        if creating {
            observability::record_memory_created();
        }
        info!(memory = %handle, "Memory session established");

        // Progress reporting for both phases
        let progress: ProgressCallback = Arc::new(|event| match &event {
            ProgressEvent::Split { record, total } => {
                debug!(phase = event.phase(), path = %record.path, total, "progress");
            }
            ProgressEvent::Dispatch { record, total } => {
                observability::record_segment_submitted(record.saved == Some(true));
                debug!(phase = event.phase(), path = %record.path, total, "progress");
            }
        });

        // Split oversized records into token-bounded segments
        let segments = segmenter::split_records(records, budget, counter.as_ref(), &progress)?;
        let segment_count = segments.len() as u64;
        observability::record_segments_produced(segments.len());
        info!(
            records = originals.len(),
            segments = segments.len(),
            "Segmentation complete"
        );

        // Aggregate split statistics per original record
        let mut session_metrics = SessionMetricsAggregator::new();
        let mut cursor = 0usize;
        for count in segment_counts(&originals, &segments) {
            let tokens: Vec<usize> = segments[cursor..cursor + count]
                .iter()
                .map(|s| counter.count(&s.content))
                .collect();
            session_metrics.record_split(count, &tokens);
            cursor += count;
        }

        // Dispatch in batches
        let dispatcher =
            BatchDispatcher::with_batch_size(Arc::clone(&store), blueprint.session.batch_size);
        let results = dispatcher
            .dispatch(segments, budget, &handle, &progress)
            .await
            .context("Dispatch failed")?;

        for record in &results {
            session_metrics.record_submission(record.saved == Some(true));
        }
        let snapshot = dispatcher.metrics().snapshot();

        Ok(PipelineStats {
            records_ingested: originals.len() as u64,
            segments_produced: segment_count,
            segments_saved: snapshot.saved_count,
            segments_declined: snapshot.nacked_count,
            batches_settled: snapshot.batch_count,
            memory_id: handle.to_string(),
            duration: start_time.elapsed(),
            session_metrics,
        })
    }
}

/// Map the segment list back onto the original records.
///
/// Splitting preserves order: each original either passes through with its
/// path unchanged or is replaced by consecutive children `"{path}_{index}"`.
fn segment_counts(originals: &[TextRecord], segments: &[TextRecord]) -> Vec<usize> {
    let mut counts = Vec::with_capacity(originals.len());
    let mut cursor = 0usize;

    for original in originals {
        if cursor < segments.len() && segments[cursor].path == original.path {
            counts.push(1);
            cursor += 1;
            continue;
        }

        let mut n = 0usize;
        while cursor < segments.len()
            && segments[cursor].path == format!("{}_{}", original.path, n)
        {
            n += 1;
            cursor += 1;
        }
        counts.push(n);
    }

    counts
}
