//! # Ingestion
//!
//! Text record collection module.
//!
//! Responsibilities:
//! - Register record sources (directory trees, mock fixtures)
//! - Read source files into `TextRecord`s with stable, relative paths
//! - Skip non-text content instead of failing the run
//!
//! Collection is deterministic: a directory source walks its tree in sorted
//! order, so the same tree always yields the same record sequence.

mod directory;
mod error;
mod mock;
mod source;

pub use directory::DirectorySource;
pub use error::{IngestionError, Result};
pub use mock::MockSource;
pub use source::RecordSource;
