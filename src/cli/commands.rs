//! CLI command definitions for swaprunn.

use std::net::SocketAddr;

use clap::Parser;

use crate::config::AppConfig;
use crate::server;
use crate::storage::{Database, MigrationRunner};

/// Vehicle-delivery marketplace API server.
#[derive(Parser)]
#[command(name = "swaprunn")]
#[command(about = "SwapRunn marketplace API: dealerships, salespeople, drivers")]
#[command(version)]
#[command(
    long_about = "swaprunn serves the SwapRunn marketplace REST API over a SQLite store.\n\nExample usage:\n  swaprunn migrate --database ./swaprunn.db\n  swaprunn serve --bind 127.0.0.1:8080 --database ./swaprunn.db"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Run the API server.
    Serve(ServeArgs),

    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
}

/// Arguments for `swaprunn serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides SWAPRUNN_BIND).
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// SQLite database path (overrides SWAPRUNN_DB).
    #[arg(long)]
    pub database: Option<String>,
}

/// Arguments for `swaprunn migrate`.
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// SQLite database path (overrides SWAPRUNN_DB).
    #[arg(long)]
    pub database: Option<String>,

    /// Drop all tables before migrating. Destroys all data.
    #[arg(long)]
    pub reset: bool,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Dispatches a parsed CLI invocation.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve(args) => {
            let mut config = AppConfig::from_env()?;
            if let Some(bind) = args.bind {
                config.bind_addr = bind;
            }
            if let Some(database) = args.database {
                config.database_path = database;
            }
            config.validate()?;

            server::run_server(config).await
        }
        Commands::Migrate(args) => {
            let mut config = AppConfig::from_env()?;
            if let Some(database) = args.database {
                config.database_path = database;
            }
            config.validate()?;

            let db = Database::open(&config.database_path).await?;
            let runner = MigrationRunner::new(db.pool().clone());

            if args.reset {
                tracing::warn!("resetting database, all data will be lost");
                runner.reset_database().await?;
            }

            runner.run_migrations().await?;
            let applied = runner.list_applied_migrations().await?;
            tracing::info!(
                count = applied.len(),
                path = %config.database_path,
                "migrations applied"
            );
            Ok(())
        }
    }
}
