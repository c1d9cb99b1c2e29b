use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mindease_api::{
    build_router,
    config::Config,
    state::{AppState, StoreBackend},
};
use mindease_core::CompletionGateway;
use mindease_persist::{MemoryStore, MongoPersistenceClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting MindEase API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Completion gateway; a missing key disables chat instead of aborting
    let gateway = CompletionGateway::from_credential(
        config.groq_api_key.clone(),
        config.llm.base_url.clone(),
        config.llm.model.clone(),
    )?;

    // Persistence: MongoDB when configured, in-memory otherwise
    let state = match config.mongodb_uri.clone() {
        Some(uri) => {
            tracing::info!("Connecting to MongoDB");
            let client = Arc::new(
                MongoPersistenceClient::connect(&uri, &config.mongodb.database).await?,
            );
            if let Err(e) = client.ping().await {
                tracing::warn!("MongoDB not reachable yet: {}", e);
            } else {
                tracing::info!("MongoDB connected");
            }
            AppState::new(config.clone(), gateway, client.clone(), StoreBackend::Mongo(client))
        }
        None => {
            tracing::warn!("MONGODB_URI not set, using in-memory store (data is lost on restart)");
            AppState::new(
                config.clone(),
                gateway,
                Arc::new(MemoryStore::new()),
                StoreBackend::Memory,
            )
        }
    };

    let app = build_router(Arc::new(state));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
