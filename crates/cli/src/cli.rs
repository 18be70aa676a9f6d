//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Memloader - token-bounded text segmentation and memory store loading
#[derive(Parser, Debug)]
#[command(
    name = "memloader",
    author,
    version,
    about = "Load text sources into a remote memory store",
    long_about = "A batch loading pipeline for remote memory stores.\n\n\
                  Collects text records from configured sources, splits oversized \n\
                  records into token-bounded segments at natural text boundaries, \n\
                  and submits them to the memory store in bounded batches."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MEMLOADER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MEMLOADER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the loading pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Source paths to load (in addition to configured sources)
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "MEMLOADER_CONFIG")]
    pub config: PathBuf,

    /// Override memory store endpoint from configuration
    #[arg(long, env = "MEMLOADER_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Override memory store access token from configuration
    #[arg(long, env = "MEMLOADER_API_TOKEN")]
    pub api_token: Option<String>,

    /// Load into an existing memory instead of creating one
    #[arg(long, env = "MEMLOADER_MEMORY_ID")]
    pub memory_id: Option<String>,

    /// Override token budget per segment
    #[arg(long, env = "MEMLOADER_MAX_TOKENS")]
    pub max_tokens: Option<usize>,

    /// Override dispatch batch size
    #[arg(long, env = "MEMLOADER_BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Override tokenizer encoding (e.g. cl100k_base, byte-estimate)
    #[arg(long, env = "MEMLOADER_ENCODING")]
    pub encoding: Option<String>,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Use the in-process mock store instead of the remote service
    #[arg(long)]
    pub mock_store: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "MEMLOADER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show detailed source information
    #[arg(long)]
    pub sources: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_accepts_positional_paths_and_encoding() {
        let cli = Cli::try_parse_from([
            "memloader",
            "run",
            "./docs",
            "./notes",
            "--encoding",
            "o200k_base",
            "--mock-store",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.paths, vec![PathBuf::from("./docs"), PathBuf::from("./notes")]);
        assert_eq!(args.encoding.as_deref(), Some("o200k_base"));
        assert!(args.mock_store);
    }

    #[test]
    fn test_run_parses_without_positional_paths() {
        let cli = Cli::try_parse_from(["memloader", "run", "--config", "pipeline.toml"]).unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert!(args.paths.is_empty());
        assert_eq!(args.config, PathBuf::from("pipeline.toml"));
        assert!(args.encoding.is_none());
    }
}
