//! pollme HTTP gateway binary.

use clap::Parser;
use pollme_gateway::{create_router, AppState, Args, GatewayConfig};
use pollme_polls::{installed_apps, PollService};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!(
        listen = %config.listen_addr,
        data_dir = ?config.data_dir,
        include_apps = ?config.included_apps,
        "Starting pollme gateway"
    );

    let registry = installed_apps()?;
    let polls = PollService::open(config.store_config())?;
    info!(apps = registry.apps().len(), "Loaded installed apps");

    // Create application state
    let state = AppState::new(registry, polls, config.clone());

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
