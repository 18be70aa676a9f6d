//! SessionBlueprint - parsed session configuration
//!
//! The blueprint is produced by `config_loader` (TOML/JSON) and optionally
//! amended by CLI overrides before the pipeline starts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default token budget per segment.
pub const DEFAULT_MAX_TOKENS: usize = 2000;

/// Default dispatch batch size.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default token counter encoding.
pub const DEFAULT_ENCODING: &str = "cl100k_base";

/// Configuration schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    /// Initial schema
    #[default]
    #[serde(rename = "v1")]
    V1,
}

/// Top-level session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionBlueprint {
    /// Schema version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Remote memory store connection settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Segmentation and dispatch settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Record sources to ingest
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Remote store connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the memory store API
    #[serde(default)]
    pub endpoint: String,

    /// Access token sent with every request
    #[serde(default)]
    pub api_token: String,

    /// Pre-existing memory id; when set, memory creation is skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_id: Option<String>,
}

/// Segmentation and dispatch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Token budget per segment (strict exclusive upper bound)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Number of records submitted concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Token counter encoding name
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            batch_size: DEFAULT_BATCH_SIZE,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

/// One record source entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique source id (used for logging and error reporting)
    pub id: String,

    /// File or directory path to ingest
    pub path: String,

    /// Source kind
    #[serde(default)]
    pub source_type: SourceType,

    /// Free-form source parameters (reserved for future source kinds)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

/// Supported source kinds
///
/// PDF and audio ingestion are external collaborators and intentionally not
/// modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Recursive directory walk (a plain file path is also accepted)
    #[default]
    Directory,
}

fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.encoding, "cl100k_base");
    }

    #[test]
    fn test_blueprint_deserializes_with_defaults() {
        let blueprint: SessionBlueprint = serde_json::from_str("{}").unwrap();
        assert_eq!(blueprint.version, ConfigVersion::V1);
        assert_eq!(blueprint.session.max_tokens, 2000);
        assert!(blueprint.sources.is_empty());
        assert!(blueprint.store.memory_id.is_none());
    }

    #[test]
    fn test_source_type_default_is_directory() {
        let json = r#"{"id": "src", "path": "./src"}"#;
        let source: SourceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(source.source_type, SourceType::Directory);
    }
}
