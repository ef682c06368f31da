//! ChronoVault - Personal time-capsule vault with diary and AI reflections
//!
//! Binary entry point: loads the immutable configuration, wires the stores
//! and pipeline together, and serves the HTTP API.

use anyhow::Result;
use chronovault::{
    api::build_app,
    auth::{AuthState, SessionManager, UserStore},
    clock::{SharedClock, SystemClock},
    config::VaultConfig,
    diary::{DiaryState, DiaryStore},
    insight::{HttpGenerativeBackend, InsightPipeline, InsightState},
    vault::{CapsuleStore, VaultState},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chronovault")]
#[command(author = "ChronoVault Team")]
#[command(version)]
#[command(about = "Personal time-capsule vault with diary and AI reflections")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CHRONOVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the ChronoVault server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("chronovault={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration once; components receive references, never globals
    let config = if let Some(config_path) = &cli.config {
        let content = std::fs::read_to_string(config_path)?;
        VaultConfig::from_toml(&content)?
    } else {
        VaultConfig::default()
    };

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await?;
        }
        Commands::Config { default } => {
            let shown = if default { VaultConfig::default() } else { config };
            println!("{}", toml::to_string_pretty(&shown)?);
        }
    }

    Ok(())
}

async fn serve(config: VaultConfig) -> Result<()> {
    tracing::info!("Starting ChronoVault");

    let clock: SharedClock = Arc::new(SystemClock);

    // Stores
    let users = Arc::new(
        UserStore::new(
            config.storage.users_dir(),
            config.auth.pbkdf2_iterations,
            clock.clone(),
        )
        .await?,
    );
    let capsules = Arc::new(CapsuleStore::new(config.storage.capsules_dir(), clock.clone()).await?);
    let diary = Arc::new(DiaryStore::new(config.storage.diary_dir(), clock.clone()).await?);

    // Sessions and the insight pipeline
    let sessions = Arc::new(SessionManager::new(config.auth.session_ttl_secs, clock.clone()));
    let backend = Arc::new(HttpGenerativeBackend::new(&config.insight)?);
    let pipeline = Arc::new(InsightPipeline::new(backend, diary.clone()));

    let app = build_app(
        AuthState {
            users,
            sessions: sessions.clone(),
        },
        VaultState {
            store: capsules,
            clock: clock.clone(),
            sessions: sessions.clone(),
        },
        DiaryState {
            store: diary,
            sessions: sessions.clone(),
        },
        InsightState {
            pipeline,
            sessions,
        },
        &config.server.cors_origins,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("ChronoVault listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ChronoVault stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    } else {
        tracing::info!("Shutting down...");
    }
}
