//! MemorySession - one memory handle per run

use std::sync::Arc;

use contracts::{ContractError, MemoryHandle, MemoryStore};
use tracing::{debug, info, instrument};

/// Session over a memory store.
///
/// Holds the handle of the memory all records of a run are written into.
/// The handle is either supplied up front (resuming into an existing memory)
/// or created on first use; it is never created twice. The store is shared
/// so the dispatcher can submit against the same client.
pub struct MemorySession<S> {
    store: Arc<S>,
    handle: Option<MemoryHandle>,
}

impl<S> MemorySession<S>
where
    S: MemoryStore + Send + Sync,
{
    /// Create a session that will allocate a fresh memory on first use
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            handle: None,
        }
    }

    /// Create a session bound to an existing memory
    pub fn with_handle(store: Arc<S>, handle: MemoryHandle) -> Self {
        Self {
            store,
            handle: Some(handle),
        }
    }

    /// Whether a handle has been established
    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Establish the memory handle, creating the memory if needed.
    ///
    /// Idempotent: once a handle is present (supplied or created) later
    /// calls return it without touching the store.
    #[instrument(name = "session_ensure_initialized", skip(self))]
    pub async fn ensure_initialized(&mut self) -> Result<&MemoryHandle, ContractError> {
        if self.handle.is_none() {
            let handle = self.store.create().await?;
            info!(memory = %handle, "memory created");
            self.handle = Some(handle);
        } else {
            debug!("memory handle already established");
        }

        // Presence was just ensured above
        self.handle
            .as_ref()
            .ok_or(ContractError::HandleNotEstablished)
    }

    /// The established handle.
    ///
    /// # Errors
    /// Returns [`ContractError::HandleNotEstablished`] if called before
    /// [`MemorySession::ensure_initialized`] on a session without a handle.
    pub fn handle(&self) -> Result<&MemoryHandle, ContractError> {
        self.handle
            .as_ref()
            .ok_or(ContractError::HandleNotEstablished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockMemoryStore;

    #[tokio::test]
    async fn test_create_called_once() {
        let store = Arc::new(MockMemoryStore::new("mem-42"));
        let mut session = MemorySession::new(store);

        assert!(!session.is_initialized());
        let first = session.ensure_initialized().await.unwrap().clone();
        let second = session.ensure_initialized().await.unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(first.as_str(), "mem-42");
        assert_eq!(session.store().create_calls(), 1);
    }

    #[tokio::test]
    async fn test_existing_handle_skips_create() {
        let store = Arc::new(MockMemoryStore::new("unused"));
        let mut session = MemorySession::with_handle(store, MemoryHandle::new("mem-7"));

        assert!(session.is_initialized());
        let handle = session.ensure_initialized().await.unwrap();
        assert_eq!(handle.as_str(), "mem-7");
        assert_eq!(session.store().create_calls(), 0);
    }

    #[tokio::test]
    async fn test_handle_before_init_is_an_error() {
        let session = MemorySession::new(Arc::new(MockMemoryStore::new("mem-1")));
        let err = session.handle().unwrap_err();
        assert!(matches!(err, ContractError::HandleNotEstablished));
    }

    #[tokio::test]
    async fn test_create_failure_leaves_session_uninitialized() {
        let store = Arc::new(MockMemoryStore::new("mem-1").fail_create());
        let mut session = MemorySession::new(store);

        assert!(session.ensure_initialized().await.is_err());
        assert!(!session.is_initialized());
    }
}
