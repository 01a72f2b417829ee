use secrecy::SecretString;
use url::Url;

/// Request-log forwarding configuration
///
/// Enabled only when both the API token and dataset name are present;
/// presence of exactly one is a startup error.
#[derive(Debug, Clone)]
pub struct LogIngestConfig {
    /// API token for the log-ingestion collaborator
    pub token: SecretString,
    /// Dataset records are ingested into
    pub dataset: String,
    /// Base URL of the ingestion API
    pub base_url: Url,
}
