//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Session Model
//! - One pipeline invocation is one session, holding at most one `MemoryHandle`
//! - Records flow ingestion -> segmenter -> dispatcher; downstream stages only
//!   expand records (1:N) or mutate the `saved` flag

mod blueprint;
mod counter;
mod error;
mod progress;
mod record;
mod store;

pub use blueprint::*;
pub use counter::TokenCounter;
pub use error::*;
pub use progress::{ProgressCallback, ProgressEvent};
pub use record::TextRecord;
pub use store::{LocalMemoryStore, MemoryHandle, MemoryStore};
