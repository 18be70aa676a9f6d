//! # Dispatcher
//!
//! Batched, concurrency-controlled submission of records to the memory store.
//!
//! Records are grouped into fixed-size batches; every record of one batch is
//! submitted concurrently (bounded fan-out = batch size) while batches
//! themselves run strictly sequentially, so total in-flight concurrency never
//! exceeds the batch size.

mod dispatcher;
mod error;
mod metrics;

pub use dispatcher::{BatchDispatcher, DEFAULT_BATCH_SIZE};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, DispatchSnapshot};
