use clap::Parser;

/// TaskHub API server
#[derive(Debug, Parser)]
#[command(name = "taskhub", about = "Task management API server")]
pub struct Args {
    /// Override the listen address
    #[arg(long, env = "TASKHUB_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    /// Log filter directive (overridden by RUST_LOG when set)
    #[arg(long, default_value = "info")]
    pub log_filter: String,
}
