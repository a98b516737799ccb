//! Postboard CLI server
//!
//! ```sh
//! # Default config (~/.config/postboard/config.toml)
//! postboard
//!
//! # Custom config, port override, no database
//! postboard --config ./config.toml --port 3000 --in-memory
//!
//! # Validate config without starting
//! postboard --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use postboard::config::AppConfig;
use postboard::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "postboard",
    version,
    about = "Posts, comments and likes over a REST API",
    long_about = "Postboard REST API server.\n\n\
                  Default config: ~/.config/postboard/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "POSTBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Keep all data in memory instead of the configured database.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(postboard::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return ExitCode::FAILURE;
            }
            error!("Using default configuration.");
        }
    }

    if cli.check {
        return match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   Address     : {}", config.server.address());
                println!("   Database    : {}", config.database.url);
                println!("   Log level   : {}", config.logging.level);
                println!(
                    "   Pagination  : default {} / max {}",
                    config.pagination.default_limit, config.pagination.max_limit
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Configuration is invalid: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        in_memory: cli.in_memory,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    ExitCode::SUCCESS
}
