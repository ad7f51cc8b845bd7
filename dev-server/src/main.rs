//! Development server for the scouting list UI
//!
//! Serves the mock list endpoints populated with a deterministic dataset,
//! large enough to scroll through several pages of players, scouts and
//! reports.
//!
//! Environment variables can be set directly or loaded from a .env file:
//! - IP_ADDRESS: bind address, defaults to 127.0.0.1
//! - PORT: defaults to 8000
//! - ALLOWED_ORIGINS: CORS origins, defaults to "*"
//!
//! Usage: cargo run -p dev-server

use anyhow::Result;
use test_helpers::mock::DevDataset;
use test_helpers::telemetry::{get_subscriber, init_subscriber};
use test_helpers::{Config, MockStore, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize logging
    init_subscriber(get_subscriber("info".into()))?;

    info!("🚀 Starting scouting list development server");

    let store = MockStore::new();
    info!("📊 Loading development dataset...");
    let dataset = DevDataset::create();
    dataset.load_into(&store);

    let mut config = Config::from_env()?;
    let server = server::build(&mut config, store)?;
    tokio::spawn(server);

    info!("✅ Mock API running on http://{}:{}", config.ip, config.port);
    info!("🎯 Development server ready!");
    info!("   API: http://{}:{}/api/players", config.ip, config.port);
    info!(
        "   UI:  cd ui && BACKEND_URL=http://{}:{} trunk serve",
        config.ip, config.port
    );
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    // Keep server running until Ctrl+C
    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
