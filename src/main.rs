use periodic::config::Config;
use periodic::fact::GeminiFactGenerator;
use periodic::server::{self, AppState};
use periodic::storage::FileStore;
use periodic::{Catalog, FavoritesStore, Translations};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("periodic=info")),
        )
        .init();

    let config = Config::from_env()?;
    let catalog = Catalog::embedded()?;
    let translations = Translations::embedded()?;
    info!(elements = catalog.len(), "catalog loaded");

    let storage = FileStore::new(&config.data_dir);
    info!(dir = %storage.dir().display(), "favorites storage");
    let favorites = FavoritesStore::open(Arc::new(storage));

    let facts = GeminiFactGenerator::new(
        config.fact_endpoint.clone(),
        config.fact_model.clone(),
        config.fact_api_key.clone(),
    );
    if !facts.is_configured() {
        warn!("GEMINI_API_KEY is not set; fun facts are disabled");
    }

    let app = server::router(AppState {
        catalog: Arc::new(catalog),
        translations: Arc::new(translations),
        favorites: Arc::new(favorites),
        facts: Arc::new(facts),
        public_url: config.public_url.clone(),
    });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Serving on {}", config.public_url);
    axum::serve(listener, app).await?;
    Ok(())
}
