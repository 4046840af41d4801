// Starfire - notes backend with version history and trash recovery
// Entry point and application setup

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starfire_server::config::Config;
use starfire_server::database::{create_pool, Repository};
use starfire_server::http::{build_router, AppState};
use starfire_server::services::{SweeperService, TrashService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "starfire_server=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Starfire backend");

    let config = Config::from_env().context("Failed to read configuration")?;

    let pool = create_pool(&config.db_path)
        .await
        .context("Failed to initialize database")?;
    let repo = Repository::new(pool);

    // Periodic trash expiry sweep.
    let sweeper = SweeperService::new(TrashService::new(repo.clone()))
        .await
        .context("Failed to create sweeper")?;
    sweeper.start().await.context("Failed to start sweeper")?;

    let app = build_router(AppState::new(repo));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    sweeper.shutdown().await?;

    Ok(())
}
