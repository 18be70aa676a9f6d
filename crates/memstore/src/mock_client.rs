//! MockMemoryStore - in-process store for tests and dry runs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use contracts::{ContractError, MemoryHandle, MemoryStore};
use tracing::debug;

/// In-memory stand-in for the remote memory service.
///
/// Records every update payload it receives and can be scripted to fail or
/// decline specific submissions.
pub struct MockMemoryStore {
    memory_id: String,
    create_calls: AtomicU64,
    update_calls: AtomicU64,
    payloads: Mutex<Vec<String>>,
    fail_create: bool,
    fail_payloads_containing: Option<String>,
    decline_all: bool,
}

impl MockMemoryStore {
    /// Create a mock that hands out `memory_id` on create
    pub fn new(memory_id: impl Into<String>) -> Self {
        Self {
            memory_id: memory_id.into(),
            create_calls: AtomicU64::new(0),
            update_calls: AtomicU64::new(0),
            payloads: Mutex::new(Vec::new()),
            fail_create: false,
            fail_payloads_containing: None,
            decline_all: false,
        }
    }

    /// Script create() to fail
    pub fn fail_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Script update() to fail for payloads containing `needle`
    pub fn fail_payloads_containing(mut self, needle: impl Into<String>) -> Self {
        self.fail_payloads_containing = Some(needle.into());
        self
    }

    /// Script update() to answer every submission with a negative ack
    pub fn decline_all(mut self) -> Self {
        self.decline_all = true;
        self
    }

    /// Number of create() calls so far
    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of update() calls so far
    pub fn update_calls(&self) -> u64 {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Copies of every payload received so far
    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

impl MemoryStore for MockMemoryStore {
    async fn create(&self) -> Result<MemoryHandle, ContractError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(ContractError::store_create("mock create failure"));
        }
        debug!(memory = %self.memory_id, "mock memory created");
        Ok(MemoryHandle::new(&self.memory_id))
    }

    async fn update(
        &self,
        handle: &MemoryHandle,
        payload: &str,
        _budget: usize,
    ) -> Result<bool, ContractError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(needle) = &self.fail_payloads_containing {
            if payload.contains(needle.as_str()) {
                return Err(ContractError::store_update(
                    handle.as_str(),
                    "mock update failure",
                ));
            }
        }
        self.payloads.lock().unwrap().push(payload.to_string());
        Ok(!self.decline_all)
    }
}
