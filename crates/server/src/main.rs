use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readnook_core::{
    load_config, validate_config, AuthorResolver, BookCatalog, DetailOrchestrator, Encyclopedia,
    GoogleBooksClient, RankingPolicy, SearchOrchestrator, TtlCache, WikipediaClient,
};
use readnook_server::api::create_router;
use readnook_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("READNOOK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    if config.catalog.api_key.is_none() {
        info!("No catalog API key configured, using anonymous quota");
    }

    // Catalog provider
    let catalog: Arc<dyn BookCatalog> = Arc::new(
        GoogleBooksClient::new(&config.catalog).context("Failed to create catalog client")?,
    );
    info!(
        "Catalog client initialized (timeout {}s)",
        config.catalog.timeout_secs
    );

    // Encyclopedia provider
    let wikipedia =
        WikipediaClient::new(&config.encyclopedia).context("Failed to create Wikipedia client")?;
    let encyclopedia: Arc<dyn Encyclopedia> = Arc::new(AuthorResolver::new(wikipedia));
    info!(
        "Encyclopedia client initialized (language {})",
        config.encyclopedia.language
    );

    // Search cache
    let cache = Arc::new(TtlCache::from_config(&config.cache));
    info!(
        "Search cache initialized (ttl {}s, max {} entries)",
        config.cache.ttl_secs, config.cache.max_entries
    );

    let search = SearchOrchestrator::new(
        Arc::clone(&catalog),
        cache,
        RankingPolicy::from_config(&config.catalog),
    );
    let details = DetailOrchestrator::new(catalog, encyclopedia);

    let state = Arc::new(AppState::new(config.clone(), search, details));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
