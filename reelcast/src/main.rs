mod server;

use anyhow::Result;
use tracing::{info, warn};

use reelcast_core::{logging, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (optional file + REELCAST_* env overrides)
    let config_file = std::env::var("REELCAST_CONFIG").ok();
    let config = Config::load(config_file.as_deref())?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Reelcast server starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Validate configuration (fail fast on misconfigurations)
    if let Err(errors) = config.validate() {
        for e in &errors {
            warn!("Config validation: {e}");
        }
        // A missing lookup key only matters once a stream is requested;
        // everything else is fatal.
        let fatal: Vec<_> = errors.iter().filter(|e| !e.contains("api_key")).collect();
        if !fatal.is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration validation failed with {} error(s)",
                fatal.len()
            ));
        }
    }
    if config.auth.admin_token.is_empty() {
        warn!("auth.admin_token is empty; admin routes will reject every request");
    }

    // 4. Wire components and serve
    server::run(config).await
}
