use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rss_notify::checker::{self, Mode};
use rss_notify::config::Config;
use rss_notify::db::Database;
use rss_notify::fetcher::Fetcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rss_notify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let mode = Mode::from_args(std::env::args().skip(1));

    // Load configuration
    let config_path =
        std::env::var("RSS_NOTIFY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path)?;
    info!("Loaded configuration from {}", config_path);

    // Initialize database
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:notified_entries.db?mode=rwc".to_string());
    let db = Database::new(&database_url).await?;
    db.initialize().await?;

    let client = Fetcher::build_client()?;
    checker::start(&config, db, client, mode, checker::shutdown_signal()).await
}
