//! MemoryStore trait - remote memory store abstraction
//!
//! Defines the create/update contract the dispatcher consumes. The store's
//! embedding and indexing internals are deliberately opaque.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Opaque identifier for a remote memory session.
///
/// Created at most once per session; never replaced or rotated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryHandle(String);

impl MemoryHandle {
    /// Wrap an existing memory id (e.g. one supplied by the caller).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemoryHandle {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MemoryHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Remote memory store trait
///
/// All store implementations must implement this trait. `update` returns the
/// store's acknowledgement; a transport or protocol failure is an `Err`, a
/// well-formed negative acknowledgement is `Ok(false)`.
#[trait_variant::make(MemoryStore: Send)]
pub trait LocalMemoryStore {
    /// Create a new memory and return its handle
    ///
    /// # Errors
    /// Returns a store error (should include context)
    async fn create(&self) -> Result<MemoryHandle, ContractError>;

    /// Submit one serialized record to the memory
    ///
    /// `payload` is the JSON-serialized `TextRecord`; `budget` is the session
    /// token budget the store may use for its own chunk validation.
    async fn update(
        &self,
        handle: &MemoryHandle,
        payload: &str,
        budget: usize,
    ) -> Result<bool, ContractError>;
}
