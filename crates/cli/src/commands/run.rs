//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{SessionBlueprint, SourceConfig, SourceType};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let mut blueprint = load_blueprint(args)?;

    // Positional paths become sources alongside any configured ones
    for (index, path) in args.paths.iter().enumerate() {
        blueprint.sources.push(SourceConfig {
            id: format!("arg_{index}"),
            path: path.display().to_string(),
            source_type: SourceType::Directory,
            params: Default::default(),
        });
    }

    // Apply CLI overrides
    if let Some(ref endpoint) = args.endpoint {
        info!(endpoint = %endpoint, "Overriding store endpoint from CLI");
        blueprint.store.endpoint = endpoint.clone();
    }
    if let Some(ref api_token) = args.api_token {
        info!("Overriding store access token from CLI");
        blueprint.store.api_token = api_token.clone();
    }
    if let Some(ref memory_id) = args.memory_id {
        info!(memory_id = %memory_id, "Loading into existing memory");
        blueprint.store.memory_id = Some(memory_id.clone());
    }
    if let Some(max_tokens) = args.max_tokens {
        if max_tokens == 0 {
            anyhow::bail!("--max-tokens must be > 0");
        }
        info!(max_tokens, "Overriding token budget from CLI");
        blueprint.session.max_tokens = max_tokens;
    }
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 {
            anyhow::bail!("--batch-size must be > 0");
        }
        info!(batch_size, "Overriding batch size from CLI");
        blueprint.session.batch_size = batch_size;
    }
    if let Some(ref encoding) = args.encoding {
        if encoding.is_empty() {
            anyhow::bail!("--encoding must not be empty");
        }
        info!(encoding = %encoding, "Overriding tokenizer encoding from CLI");
        blueprint.session.encoding = encoding.clone();
    }

    if blueprint.sources.is_empty() {
        anyhow::bail!("No sources configured; pass source paths or list them in the config file");
    }
    if blueprint.store.endpoint.is_empty() && !args.mock_store {
        anyhow::bail!("No store endpoint configured; pass --endpoint or use --mock-store");
    }

    info!(
        endpoint = %blueprint.store.endpoint,
        sources = blueprint.sources.len(),
        max_tokens = blueprint.session.max_tokens,
        batch_size = blueprint.session.batch_size,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        blueprint,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
        use_mock_store: args.mock_store,
    };

    // Create and run pipeline
    let pipeline = Pipeline::new(pipeline_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting pipeline...");

    // Run pipeline with shutdown signal
    tokio::select! {
        result = pipeline.run() => {
            match result {
                Ok(stats) => {
                    info!(
                        records = stats.records_ingested,
                        segments = stats.segments_produced,
                        saved = stats.segments_saved,
                        duration_secs = stats.duration.as_secs_f64(),
                        "Pipeline completed successfully"
                    );

                    // Print detailed statistics
                    stats.print_summary();
                }
                Err(e) => {
                    return Err(e).context("Pipeline execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    info!("Memloader finished");
    Ok(())
}

/// Load the blueprint from the config file, or start from defaults when only
/// positional source paths were given.
fn load_blueprint(args: &RunArgs) -> Result<SessionBlueprint> {
    if args.config.exists() {
        info!(config = %args.config.display(), "Loading configuration");
        return config_loader::ConfigLoader::load_from_path(&args.config)
            .with_context(|| format!("Failed to load config from {}", args.config.display()));
    }

    if args.paths.is_empty() {
        anyhow::bail!(
            "Configuration file not found: {} (pass source paths or --config)",
            args.config.display()
        );
    }

    info!("No configuration file, using defaults with positional sources");
    Ok(SessionBlueprint::default())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &SessionBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Store:");
    println!("  Endpoint: {}", blueprint.store.endpoint);
    match &blueprint.store.memory_id {
        Some(id) => println!("  Memory: {} (existing)", id),
        None => println!("  Memory: (created at run time)"),
    }
    println!("\nSession:");
    println!("  Token budget: {}", blueprint.session.max_tokens);
    println!("  Batch size: {}", blueprint.session.batch_size);
    println!("  Encoding: {}", blueprint.session.encoding);
    println!("\nSources ({}):", blueprint.sources.len());
    for source in &blueprint.sources {
        println!("  - {} ({:?}): {}", source.id, source.source_type, source.path);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base_args() -> RunArgs {
        RunArgs {
            paths: Vec::new(),
            config: PathBuf::from("/nonexistent/memloader-config.toml"),
            endpoint: None,
            api_token: None,
            memory_id: None,
            max_tokens: None,
            batch_size: None,
            encoding: None,
            dry_run: false,
            mock_store: true,
            metrics_port: 0,
        }
    }

    #[tokio::test]
    async fn test_run_with_positional_paths_and_no_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello world").unwrap();

        let mut args = base_args();
        args.paths = vec![dir.path().to_path_buf()];
        args.encoding = Some("byte-estimate".to_string());

        run_pipeline(&args).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_without_config_or_paths_fails() {
        let args = base_args();
        let err = run_pipeline(&args).await.unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[tokio::test]
    async fn test_run_rejects_empty_encoding() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let mut args = base_args();
        args.paths = vec![dir.path().to_path_buf()];
        args.encoding = Some(String::new());

        let err = run_pipeline(&args).await.unwrap_err();
        assert!(err.to_string().contains("--encoding"));
    }
}
