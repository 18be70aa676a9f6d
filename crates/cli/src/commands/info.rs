//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    store: StoreInfo,
    session: SessionInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sources: Vec<SourceInfo>,
}

#[derive(Serialize)]
struct StoreInfo {
    endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_id: Option<String>,
    token_configured: bool,
}

#[derive(Serialize)]
struct SessionInfo {
    max_tokens: usize,
    batch_size: usize,
    encoding: String,
}

#[derive(Serialize)]
struct SourceInfo {
    id: String,
    source_type: String,
    path: String,
    #[serde(skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    params: std::collections::BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &contracts::SessionBlueprint, args: &InfoArgs) -> ConfigInfo {
    let sources = if args.sources {
        blueprint
            .sources
            .iter()
            .map(|s| SourceInfo {
                id: s.id.clone(),
                source_type: format!("{:?}", s.source_type),
                path: s.path.clone(),
                params: s.params.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        store: StoreInfo {
            endpoint: blueprint.store.endpoint.clone(),
            memory_id: blueprint.store.memory_id.clone(),
            token_configured: !blueprint.store.api_token.is_empty(),
        },
        session: SessionInfo {
            max_tokens: blueprint.session.max_tokens,
            batch_size: blueprint.session.batch_size,
            encoding: blueprint.session.encoding.clone(),
        },
        sources,
    }
}

fn print_config_info(blueprint: &contracts::SessionBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Memloader Configuration                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Store info
    println!("🗄  Store");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Endpoint: {}", blueprint.store.endpoint);
    match &blueprint.store.memory_id {
        Some(id) => println!("   ├─ Memory: {} (existing)", id),
        None => println!("   ├─ Memory: (created at run time)"),
    }
    if blueprint.store.api_token.is_empty() {
        println!("   └─ Access token: (not set)");
    } else {
        println!("   └─ Access token: configured");
    }

    // Session settings
    println!("\n⚙️  Session Settings");
    println!("   ├─ Token budget: {}", blueprint.session.max_tokens);
    println!("   ├─ Batch size: {}", blueprint.session.batch_size);
    println!("   └─ Encoding: {}", blueprint.session.encoding);

    // Sources
    println!("\n📁 Sources ({})", blueprint.sources.len());
    for (i, source) in blueprint.sources.iter().enumerate() {
        let is_last = i == blueprint.sources.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        println!(
            "   {} {} ({:?}): {}",
            prefix, source.id, source.source_type, source.path
        );

        if args.sources && !source.params.is_empty() {
            let child_prefix = if is_last { "   " } else { "│  " };
            for (key, value) in &source.params {
                println!("   {}     {} = {}", child_prefix, key, value);
            }
        }
    }

    println!();
}
