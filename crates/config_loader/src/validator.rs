//! Configuration validation
//!
//! Validation rules:
//! - store.endpoint non-empty
//! - session.max_tokens > 0 (strict upper bound needs headroom)
//! - session.batch_size > 0
//! - source ids unique
//! - source paths non-empty

use std::collections::HashSet;

use contracts::{ContractError, SessionBlueprint};

/// Validate a SessionBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    validate_store(blueprint)?;
    validate_session(blueprint)?;
    validate_sources(blueprint)?;
    Ok(())
}

/// Validate store connection settings
fn validate_store(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    if blueprint.store.endpoint.is_empty() {
        return Err(ContractError::config_validation(
            "store.endpoint",
            "endpoint cannot be empty",
        ));
    }
    if let Some(memory_id) = &blueprint.store.memory_id {
        if memory_id.is_empty() {
            return Err(ContractError::config_validation(
                "store.memory_id",
                "memory_id cannot be empty when set; omit it to create a new memory",
            ));
        }
    }
    Ok(())
}

/// Validate segmentation and dispatch settings
fn validate_session(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    let session = &blueprint.session;

    if session.max_tokens == 0 {
        return Err(ContractError::config_validation(
            "session.max_tokens",
            "max_tokens must be > 0",
        ));
    }

    if session.batch_size == 0 {
        return Err(ContractError::config_validation(
            "session.batch_size",
            "batch_size must be > 0",
        ));
    }

    if session.encoding.is_empty() {
        return Err(ContractError::config_validation(
            "session.encoding",
            "encoding cannot be empty",
        ));
    }

    Ok(())
}

/// Validate source id uniqueness and paths
fn validate_sources(blueprint: &SessionBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, source) in blueprint.sources.iter().enumerate() {
        if source.id.is_empty() {
            return Err(ContractError::config_validation(
                format!("sources[{idx}].id"),
                "source id cannot be empty",
            ));
        }
        if !seen.insert(&source.id) {
            return Err(ContractError::config_validation(
                format!("sources[id={}]", source.id),
                "duplicate source id",
            ));
        }
        if source.path.is_empty() {
            return Err(ContractError::config_validation(
                format!("sources[{}].path", source.id),
                "source path cannot be empty",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SourceConfig, SourceType, StoreConfig};
    use std::collections::BTreeMap;

    fn source(id: &str, path: &str) -> SourceConfig {
        SourceConfig {
            id: id.to_string(),
            path: path.to_string(),
            source_type: SourceType::Directory,
            params: BTreeMap::new(),
        }
    }

    fn valid_blueprint() -> SessionBlueprint {
        SessionBlueprint {
            store: StoreConfig {
                endpoint: "http://localhost:8080".to_string(),
                api_token: "token".to_string(),
                memory_id: None,
            },
            sources: vec![source("docs", "./docs")],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_blueprint_passes() {
        assert!(validate(&valid_blueprint()).is_ok());
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let mut bp = valid_blueprint();
        bp.store.endpoint.clear();
        let err = validate(&bp).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { field, .. } if field == "store.endpoint"));
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let mut bp = valid_blueprint();
        bp.session.max_tokens = 0;
        let err = validate(&bp).unwrap_err();
        assert!(
            matches!(err, ContractError::ConfigValidation { field, .. } if field == "session.max_tokens")
        );
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut bp = valid_blueprint();
        bp.session.batch_size = 0;
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_duplicate_source_ids_rejected() {
        let mut bp = valid_blueprint();
        bp.sources.push(source("docs", "./other"));
        let err = validate(&bp).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { message, .. } if message.contains("duplicate")));
    }

    #[test]
    fn test_empty_source_path_rejected() {
        let mut bp = valid_blueprint();
        bp.sources[0].path.clear();
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_empty_memory_id_rejected() {
        let mut bp = valid_blueprint();
        bp.store.memory_id = Some(String::new());
        assert!(validate(&bp).is_err());
    }
}
