use std::sync::Arc;

use tracing::{error, info};

use hotentry_rss::hotentry::start_refresher;
use hotentry_rss::{AppState, Config, HatenaClient, Refresher, SnapshotCache, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = hotentry_rss::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        hotentry_rss::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "hotentry-rss stopped");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> hotentry_rss::Result<()> {
    config.validate()?;

    info!("hotentry-rss - Hatena hot entry RSS");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let client = Arc::new(HatenaClient::new(&config.source)?);
    let cache = Arc::new(SnapshotCache::new());

    let refresher = Arc::new(Refresher::with_interval(
        client.clone(),
        cache.clone(),
        config.refresh.interval_secs,
    ));
    // The eager refresh completes before the listener is bound
    let _refresh_task = start_refresher(refresher).await;

    let app_state = AppState::with_feed_config(client, cache, &config.feed)
        .with_public_url(config.server.public_url.clone());

    WebServer::new(&config.server, Arc::new(app_state))?
        .run()
        .await
}
