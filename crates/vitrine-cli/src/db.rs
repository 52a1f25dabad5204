//! Database maintenance commands.

use std::path::PathBuf;

use clap::Subcommand;
use vitrine_core::AppConfig;
use vitrine_db::{DocumentStore, PgDocumentStore};

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load fixture documents into their collections
    Seed {
        /// Fixture file (defaults to `VITRINE_SEED_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub(crate) async fn run(
    command: DbCommands,
    pool: &sqlx::PgPool,
    config: &AppConfig,
) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            PgDocumentStore::new(pool.clone()).ping().await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = vitrine_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed { path } => {
            let path = seed_path(path, config);
            let fixtures = vitrine_core::load_fixtures(&path)?;
            tracing::info!(
                path = %path.display(),
                documents = fixtures.document_count(),
                "loaded fixtures"
            );
            vitrine_db::run_migrations(pool).await?;
            let store = PgDocumentStore::new(pool.clone());
            let written = vitrine_db::seed_collections(&store, &fixtures).await?;
            println!("seeded {written} document(s) from {}", path.display());
        }
    }
    Ok(())
}

/// Resolves `--path`, falling back to the configured seed file.
pub(crate) fn seed_path(explicit: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    explicit.unwrap_or_else(|| config.seed_path.clone())
}
