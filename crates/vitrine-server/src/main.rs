mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use vitrine_catalog::Catalog;
use vitrine_db::PgDocumentStore;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vitrine_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = vitrine_db::PoolConfig::from_app_config(&config);
    let pool = vitrine_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = vitrine_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let store = Arc::new(PgDocumentStore::new(pool));
    let catalog = Catalog::new(store, Duration::from_millis(config.store_timeout_ms));

    let auth = AuthState::from_env(matches!(
        config.env,
        vitrine_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            catalog: Arc::new(catalog),
        },
        auth,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "vitrine-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
