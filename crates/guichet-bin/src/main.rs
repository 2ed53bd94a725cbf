use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use guichet_lib::config::Settings;
use guichet_lib::router::create_router;
use guichet_lib::store::SqliteStore;
use guichet_lib::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Username/password authentication gateway.
#[derive(Parser, Debug)]
#[command(name = "guichet", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Configuration problems (a missing session secret in particular) are
    // fatal here, before anything listens.
    let settings = Settings::load_from(&args.config).context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    let store = SqliteStore::open(&settings.database_path).with_context(|| {
        format!(
            "failed to open database at {}",
            settings.database_path.display()
        )
    })?;

    let bind_addr = settings.bind_addr;
    let state = Arc::new(AppState::new(store, settings));
    let app = create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
