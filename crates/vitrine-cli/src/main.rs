mod catalog;
mod db;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vitrine_catalog::Catalog;
use vitrine_core::AppConfig;
use vitrine_db::PgDocumentStore;

use crate::catalog::CatalogCommands;
use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "vitrine-cli")]
#[command(about = "Vitrine catalog operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Browse the merged catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Print the admin dashboard figures
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("vitrine-cli: run with --help to list commands");
        return Ok(());
    };

    let config = vitrine_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = vitrine_db::PoolConfig::from_app_config(&config);
    let pool = vitrine_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => db::run(command, &pool, &config).await,
        Commands::Catalog { command } => catalog::run(command, &build_catalog(pool, &config)).await,
        Commands::Summary => {
            let summary = build_catalog(pool, &config).summary().await;
            print_json(&summary)
        }
    }
}

fn build_catalog(pool: sqlx::PgPool, config: &AppConfig) -> Catalog {
    let store = Arc::new(PgDocumentStore::new(pool));
    Catalog::new(store, Duration::from_millis(config.store_timeout_ms))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests;
