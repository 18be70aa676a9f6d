//! # Memstore
//!
//! Memory store clients and session lifecycle.
//!
//! A [`MemorySession`] wraps any [`contracts::MemoryStore`] and establishes
//! the memory handle exactly once per run. The HTTP client talks to a remote
//! memory service; the mock store keeps everything in process for tests and
//! dry runs.

#[cfg(feature = "remote")]
mod http_client;
mod mock_client;
mod session;

#[cfg(feature = "remote")]
pub use http_client::HttpMemoryStore;
pub use mock_client::MockMemoryStore;
pub use session::MemorySession;
