//! Campus HTTP server entrypoint.

use std::net::SocketAddr;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use campus::config::Config;
use campus::embedding::{EmbeddingBackend, EmbeddingProvider};
use campus::gateway::{HandlerState, create_router_with_state};
use campus::generation::GenaiModel;
use campus::query::QueryEngine;
use campus::store::InMemoryStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        model = %config.genai_model,
        "Campus starting"
    );

    let store = InMemoryStore::new();
    if let Some(path) = &config.snapshot_path {
        tracing::info!(path = %path.display(), "Hydrating store from snapshot...");
        if let Err(e) = store.hydrate(path).await {
            tracing::warn!("Failed to hydrate store: {}. Starting empty.", e);
        }
    }

    let embedder = EmbeddingBackend::from_url(config.embedding_url.as_deref(), config.embedding_dim)?;
    if embedder.is_stub() {
        tracing::warn!("No CAMPUS_EMBEDDING_URL configured, running embedder in stub mode");
    }
    tracing::info!(dimension = embedder.dimension(), "Embedder ready");

    let model = GenaiModel::new(config.genai_model.clone(), config.genai_temperature)
        .with_mock_provider(config.mock_provider);
    if model.is_mock_provider() {
        tracing::warn!("Mock provider enabled, answers are canned");
    }

    let engine = QueryEngine::new(store.clone(), embedder, model)
        .with_threshold(config.similarity_threshold)
        .with_top_k(config.top_k);

    let app = create_router_with_state(HandlerState::new(engine));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(path) = &config.snapshot_path {
        tracing::info!(path = %path.display(), "Dehydrating store to snapshot...");
        if let Err(e) = store.dehydrate(path).await {
            tracing::error!("Failed to dehydrate store: {}", e);
        }
    }

    tracing::info!("Campus shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("CAMPUS_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
