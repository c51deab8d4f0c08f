//! Test server wrapper that starts Portico on a random port

use std::net::SocketAddr;

use portico_auth::{Session, SessionStore};
use portico_config::Config;
use portico_server::{Server, ServerBuilder};
use tokio_util::sync::CancellationToken;

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        Self::start_with(Server::builder(config)).await
    }

    /// Start a test server from a prepared builder
    ///
    /// Binds to port 0 for automatic port assignment
    pub async fn start_with(builder: ServerBuilder) -> anyhow::Result<Self> {
        let server = builder.build();
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, server.into_router())
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        let client = reqwest::Client::new();

        Ok(Self { addr, shutdown, client })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Session store pre-populated with `(token, username)` pairs
pub fn sessions(entries: &[(&str, &str)]) -> SessionStore {
    let store = SessionStore::new(std::time::Duration::from_secs(60), 100);
    for (token, username) in entries {
        store
            .insert(
                token,
                Session {
                    username: (*username).to_owned(),
                },
            )
            .expect("valid test token");
    }
    store
}
