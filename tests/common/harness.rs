//! Test server harness.

use std::net::SocketAddr;
use std::time::Duration;

use campus::constants::DEFAULT_SIMILARITY_THRESHOLD;
use campus::embedding::MockEmbedder;
use campus::gateway::{HandlerState, create_router_with_state};
use campus::generation::MockModel;
use campus::query::QueryEngine;
use campus::store::InMemoryStore;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
const TEST_EMBEDDING_DIM: usize = 3;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub store: InMemoryStore,
    pub answer: String,
    pub similarity_threshold: f32,
    /// Fixed question embeddings, keyed by the trimmed question text.
    pub vectors: Vec<(String, Vec<f32>)>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            store: InMemoryStore::new(),
            answer: "X".to_string(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            vectors: Vec::new(),
        }
    }
}

impl TestServerConfig {
    pub fn with_store(mut self, store: InMemoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_vector(mut self, question: &str, vector: Vec<f32>) -> Self {
        self.vectors.push((question.to_string(), vector));
        self
    }
}

/// Running server plus handles to its mocked collaborators.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: InMemoryStore,
    pub embedder: MockEmbedder,
    pub model: MockModel,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Spawns a server on an ephemeral port with every external collaborator mocked:
/// the in-memory store, a fixed-vector embedder and a canned-answer model.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let embedder = MockEmbedder::new(TEST_EMBEDDING_DIM);
    for (question, vector) in config.vectors {
        embedder.set_vector(question, vector);
    }
    let model = MockModel::new(config.answer);

    let engine = QueryEngine::new(config.store.clone(), embedder.clone(), model.clone())
        .with_threshold(config.similarity_threshold);
    let app = create_router_with_state(HandlerState::new(engine));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        store: config.store,
        embedder,
        model,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
