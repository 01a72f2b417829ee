//! Boots the full server stack in-process for end-to-end tests

use std::net::SocketAddr;

use taskhub_config::Config;
use taskhub_server::Server;
use tokio_util::sync::CancellationToken;

/// One taskhub instance on an ephemeral local port, torn down on drop
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
}

impl TestServer {
    /// Build the router from `config` and serve it on `127.0.0.1:0`
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let router = Server::new(config)?.into_router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let serve_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { serve_shutdown.cancelled().await })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown,
            client: reqwest::Client::new(),
        })
    }

    /// Absolute URL for `path` on this instance
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
