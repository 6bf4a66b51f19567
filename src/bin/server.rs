//! Nutridb HTTP Server
//!
//! Serves nutrition lookups over a small JSON API plus static assets.
//!
//! # Configuration
//!
//! Environment variables:
//! - `NUTRIDB_HOST`: Address to bind (default: 0.0.0.0)
//! - `NUTRIDB_PORT`: Port to listen on (default: 3000)
//! - `NUTRIDB_DATA_DIR`: Directory with food_database.json and food_name_index.json (default: .)
//! - `NUTRIDB_PUBLIC_DIR`: Static asset directory (default: public)
//! - `NUTRIDB_CONFIG`: Path to config file (default: ~/.config/nutridb/config.yaml)
//!
//! # Config File Format
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 3000
//! data_dir: /var/lib/nutridb
//! public_dir: /var/lib/nutridb/public
//! ```

use nutridb::api::{self, AppState};
use nutridb::config::Config;
use nutridb::store::FoodStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutridb=info,nutridb_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None)?;

    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Public directory: {}", config.public_dir.display());

    // The store must load before we accept requests
    let store = FoodStore::load(config.storage())?;

    let public_dir = if config.public_dir.is_dir() {
        Some(config.public_dir.clone())
    } else {
        tracing::warn!(
            "Public directory {} not found, static assets disabled",
            config.public_dir.display()
        );
        None
    };

    let app = api::router(AppState::new(store), public_dir);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Nutrition server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
