//! # Katalog Server
//!
//! Item catalog backed by a key-value store.
//!
//! ## Overview
//!
//! - **Catalog**: paginated listing in creation order, spread over size-bounded
//!   partitions so no stored value outgrows the platform cap
//! - **Admin**: one live session at a time, cookie based
//! - **Images**: served straight from the stored base64 payloads
//! - **Audit log**: every admin action, newest first
//!
//! Storage is Redis in production and an in-process map for development.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use katalog_server::{
    create_app,
    infra::{
        app_state::AppState,
        config::{Config, ConfigLoad, ConfigLoader, StoreBackend},
        startup::connect_store,
    },
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "katalog-server")]
#[command(about = "Item catalog server backed by a key-value store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a TOML config file
    #[arg(long, env = "KATALOG_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Store backend: memory or redis (overrides config)
    #[arg(long, value_parser = parse_backend)]
    store: Option<StoreBackend>,

    /// Redis connection URL (overrides config)
    #[arg(long)]
    redis_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print per-partition item counts and sizes as JSON and exit
    Partitions,
}

fn parse_backend(raw: &str) -> Result<StoreBackend, String> {
    StoreBackend::parse(raw)
        .ok_or_else(|| format!("unknown store backend '{raw}' (expected memory or redis)"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_runtime_config(&cli.serve)?;

    match cli.command {
        Some(Command::Partitions) => print_partitions(config).await,
        None => run_server(config).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }
    if let Some(backend) = args.store {
        config.store.backend = backend;
    }
    if let Some(url) = args.redis_url.clone() {
        config.store.redis_url = Some(url);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

async fn print_partitions(config: Config) -> anyhow::Result<()> {
    let store = connect_store(&config.store).await?;
    let state = AppState::new(config, store).context("invalid partition layout")?;

    let stats = state
        .catalog
        .repository()
        .stats()
        .await
        .context("failed to read partitions")?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .server
        .bind_addr()
        .with_context(|| {
            format!(
                "invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let store = connect_store(&config.store).await?;
    info!(backend = store.backend_tag(), "store connected");

    let state = AppState::new(config, store).context("invalid partition layout")?;
    let layout = state.catalog.repository().layout();
    info!(
        partitions = layout.partitions().len(),
        threshold_bytes = layout.threshold_bytes(),
        "catalog ready"
    );
    if let Some(dir) = state.config().server.static_dir.as_ref() {
        info!(path = %dir.display(), "serving static assets");
    }

    let router = create_app(state);

    info!("Starting Katalog server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
