use secrecy::SecretString;
use url::Url;

/// Hosted Postgres/auth service configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the hosted service
    pub url: Url,
    /// Public (anon) API key sent with every call
    pub anon_key: SecretString,
}
