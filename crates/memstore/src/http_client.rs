//! HttpMemoryStore - REST client for the remote memory service

use contracts::{ContractError, MemoryHandle, MemoryStore, StoreConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    input: &'a str,
    max_token: usize,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    saved: bool,
}

/// Store client over the memory service REST API.
///
/// `create` allocates a memory (`POST {endpoint}/memories`), `update` appends
/// a payload to it (`PUT {endpoint}/memories/{id}`). Every request carries the
/// access token header.
pub struct HttpMemoryStore {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl HttpMemoryStore {
    /// Create a client for the service at `endpoint`
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            client: Client::new(),
        }
    }

    /// Create a client from store configuration
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.endpoint, &config.api_token)
    }

    fn memories_url(&self) -> String {
        format!("{}/memories", self.endpoint)
    }

    fn memory_url(&self, handle: &MemoryHandle) -> String {
        format!("{}/memories/{}", self.endpoint, handle)
    }
}

impl MemoryStore for HttpMemoryStore {
    #[instrument(name = "store_create", skip(self))]
    async fn create(&self) -> Result<MemoryHandle, ContractError> {
        let response = self
            .client
            .post(self.memories_url())
            .header(ACCESS_TOKEN_HEADER, &self.api_token)
            .send()
            .await
            .map_err(|e| ContractError::store_connection(e.to_string()))?
            .error_for_status()
            .map_err(|e| ContractError::store_create(e.to_string()))?;

        let body: CreateResponse = response
            .json()
            .await
            .map_err(|e| ContractError::store_create(e.to_string()))?;

        match body.id {
            Some(id) if !id.is_empty() => {
                debug!(memory = %id, "memory created");
                Ok(MemoryHandle::new(id))
            }
            _ => Err(ContractError::store_create(
                "service returned no memory id",
            )),
        }
    }

    #[instrument(
        name = "store_update",
        skip(self, payload),
        fields(memory = %handle, bytes = payload.len())
    )]
    async fn update(
        &self,
        handle: &MemoryHandle,
        payload: &str,
        budget: usize,
    ) -> Result<bool, ContractError> {
        let request = UpdateRequest {
            input: payload,
            max_token: budget,
        };

        let response = self
            .client
            .put(self.memory_url(handle))
            .header(ACCESS_TOKEN_HEADER, &self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ContractError::store_connection(e.to_string()))?
            .error_for_status()
            .map_err(|e| ContractError::store_update(handle.as_str(), e.to_string()))?;

        let body: UpdateResponse = response
            .json()
            .await
            .map_err(|e| ContractError::store_update(handle.as_str(), e.to_string()))?;

        if !body.saved {
            warn!(memory = %handle, "service declined payload");
        }
        Ok(body.saved)
    }
}
