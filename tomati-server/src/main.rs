//! # Tomati Server
//!
//! Marketplace backend for Tomati Market.
//!
//! ## Overview
//!
//! - **Listings**: product catalog with category and text filters
//! - **Likes & Promotion**: one like per user per product; three distinct
//!   likes promote a listing, permanently and exactly once
//! - **Messaging**: buyer/seller conversations with unread tracking
//! - **Notifications**: in-app notifications for promotions and messages
//!
//! ## Architecture
//!
//! The server is built on Axum and uses PostgreSQL for persistent
//! storage; JWT bearer tokens carry authentication.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tomati_core::database::PostgresDatabase;
use tomati_server::{
    AppState,
    infra::config::{
        Config, ConfigLoad, ConfigLoader, validate_database_url,
    },
    routes,
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "tomati-server")]
#[command(about = "Tomati marketplace server with like-driven product promotion")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Path to a TOML config file
    #[arg(long, env = "TOMATI_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Check database connectivity and exit
    Preflight,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        match command {
            Command::Db(DbCommand::Preflight) => {
                run_db_preflight(&cli.serve).await?;
                return Ok(());
            }
            Command::Db(DbCommand::Migrate) => {
                run_db_migrate(&cli.serve).await?;
                return Ok(());
            }
        }
    }

    run_server(cli.serve).await
}

struct ConfigBootstrap {
    config: Arc<Config>,
    database_url: String,
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<ConfigBootstrap> {
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

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Quieter defaults; override via RUST_LOG.
                    "info,tower_http=warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }

    let database_url = config.database.url.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "DATABASE_URL must be provided for PostgreSQL connections"
        )
    })?;
    validate_database_url(&database_url)
        .context("invalid database URL")?;

    Ok(ConfigBootstrap {
        config: Arc::new(config),
        database_url,
    })
}

async fn run_db_preflight(args: &ServeArgs) -> anyhow::Result<()> {
    let ConfigBootstrap {
        config,
        database_url,
    } = load_runtime_config(args)?;

    let db = PostgresDatabase::connect(
        &database_url,
        config.database.max_connections,
    )
    .await
    .context("failed to connect to PostgreSQL for preflight")?;
    db.ping().await.context("database preflight failed")?;

    info!("Database preflight passed");
    Ok(())
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let ConfigBootstrap {
        config,
        database_url,
    } = load_runtime_config(args)?;

    let db = PostgresDatabase::connect(
        &database_url,
        config.database.max_connections,
    )
    .await
    .context("failed to connect to PostgreSQL for migration")?;
    db.initialize_schema()
        .await
        .context("database migration failed")?;

    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let ConfigBootstrap {
        config,
        database_url,
    } = load_runtime_config(&args)?;

    let db = match PostgresDatabase::connect(
        &database_url,
        config.database.max_connections,
    )
    .await
    {
        Ok(db) => {
            info!("Successfully connected to PostgreSQL");
            db
        }
        Err(connect_error) => {
            return Err(anyhow::anyhow!(
                "Database connection failed: {connect_error}"
            ));
        }
    };

    db.initialize_schema()
        .await
        .context("failed to initialize database schema")?;
    info!("Database schema initialized successfully");

    let state = AppState::new(Arc::clone(&config), Arc::new(db));
    let app = routes::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!(
        "Starting Tomati Market server on {}:{}",
        config.server.host, config.server.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
