//! BatchDispatcher - sequential batches with intra-batch fan-out

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use contracts::{MemoryHandle, MemoryStore, ProgressCallback, ProgressEvent, TextRecord};

use crate::error::DispatcherError;
use crate::metrics::DispatchMetrics;

/// Default number of records submitted concurrently per batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Submits segmented records to a memory store in fixed-size batches.
///
/// Batches run strictly sequentially; within a batch one task per record is
/// spawned, so the batch size is also the cap on in-flight store calls.
pub struct BatchDispatcher<S> {
    store: Arc<S>,
    batch_size: usize,
    metrics: Arc<DispatchMetrics>,
}

impl<S> BatchDispatcher<S>
where
    S: MemoryStore + Send + Sync + 'static,
{
    /// Create a dispatcher with the default batch size
    pub fn new(store: Arc<S>) -> Self {
        Self::with_batch_size(store, DEFAULT_BATCH_SIZE)
    }

    /// Create a dispatcher with a custom batch size (minimum 1)
    pub fn with_batch_size(store: Arc<S>, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Configured batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Submit all records, batch by batch.
    ///
    /// Returns the submitted records with their `saved` flag set. The order
    /// of the returned records follows completion order inside each batch
    /// and is therefore not guaranteed to match input order.
    ///
    /// # Errors
    /// Validation errors are returned before any work starts. A failed
    /// submission settles its batch (in-flight siblings run to completion)
    /// and then propagates; later batches are never scheduled. No retries.
    #[instrument(
        name = "dispatch",
        skip(self, records, handle, progress),
        fields(records = records.len(), batch_size = self.batch_size)
    )]
    pub async fn dispatch(
        &self,
        records: Vec<TextRecord>,
        budget: usize,
        handle: &MemoryHandle,
        progress: &ProgressCallback,
    ) -> Result<Vec<TextRecord>, DispatcherError> {
        if records.is_empty() {
            return Err(DispatcherError::NoRecords);
        }
        if budget == 0 {
            return Err(DispatcherError::InvalidBudget);
        }

        let total = records.len();
        let batch_count = total.div_ceil(self.batch_size);
        info!(records = total, batches = batch_count, "dispatch started");

        let mut results = Vec::with_capacity(total);
        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            debug!(batch = batch_index, size = batch.len(), "submitting batch");
            self.submit_batch(batch, budget, handle, total, progress, &mut results)
                .await?;
            self.metrics.inc_batch_count();
        }

        info!(saved = results.len(), "dispatch complete");
        Ok(results)
    }

    /// Fan out one batch and join at the batch barrier.
    ///
    /// On failure the join loop still drains every spawned task (siblings
    /// run to completion, their successes only surface as progress events)
    /// before returning the first error.
    async fn submit_batch(
        &self,
        batch: &[TextRecord],
        budget: usize,
        handle: &MemoryHandle,
        total: usize,
        progress: &ProgressCallback,
        results: &mut Vec<TextRecord>,
    ) -> Result<(), DispatcherError> {
        let mut tasks: JoinSet<Result<TextRecord, DispatcherError>> = JoinSet::new();

        for record in batch {
            let store = Arc::clone(&self.store);
            let handle = handle.clone();
            let mut record = record.clone();
            tasks.spawn(async move {
                // Serialize before the saved flag is set; the payload is the
                // record as segmented.
                let payload = serde_json::to_string(&record)
                    .map_err(|e| DispatcherError::serialize(&record.path, e.to_string()))?;
                let ack = store.update(&handle, &payload, budget).await?;
                record.saved = Some(ack);
                Ok(record)
            });
        }

        let mut first_error: Option<DispatcherError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(record)) => {
                    if record.saved == Some(true) {
                        self.metrics.inc_saved_count();
                    } else {
                        self.metrics.inc_nacked_count();
                        warn!(path = %record.path, "store declined record");
                    }
                    progress(ProgressEvent::Dispatch {
                        record: record.clone(),
                        total,
                    });
                    if first_error.is_none() {
                        results.push(record);
                    }
                }
                Ok(Err(err)) => {
                    self.metrics.inc_failure_count();
                    warn!(error = %err, "record submission failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
                Err(join_err) => {
                    self.metrics.inc_failure_count();
                    if first_error.is_none() {
                        first_error = Some(DispatcherError::TaskJoin {
                            message: join_err.to_string(),
                        });
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
