use std::net::SocketAddr;

/// HTTP server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Address to bind; defaults to `0.0.0.0:3000` when unset
    pub listen_address: Option<SocketAddr>,
}
