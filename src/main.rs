mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use sv_core::config::Config;
use tokio_util::sync::CancellationToken;

async fn start_server(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    media_root: Option<PathBuf>,
) -> Result<()> {
    let mut config = Config::load_or_default(config_path);

    // CLI flags win over the config file.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(root) = media_root {
        config.media.root = root;
    }

    tracing::info!("Starting songvault");
    tracing::info!(
        "Server will listen on {}:{}, serving media from {}",
        config.server.host,
        config.server.port,
        config.media.root.display()
    );

    sv_server::start(config, CancellationToken::new()).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "songvault=trace,sv_server=trace,sv_core=debug,tower_http=debug".to_string()
        } else {
            "songvault=info,sv_server=info,sv_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start {
            host,
            port,
            media_root,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(cli.config.as_deref(), host, port, media_root))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("songvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read config file: {}", p.display()))?;
            Config::from_json(&contents)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Media root: {}", config.media.root.display());
    println!("  Chunk size: {}", config.media.effective_chunk_size());
    println!("  Catalog songs: {}", config.catalog.len());

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration is valid");
    } else {
        for warning in &warnings {
            println!("  warning: {warning}");
        }
    }
    Ok(())
}
