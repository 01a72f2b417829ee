use std::time::Duration;

use http::StatusCode;
use mini_moka::sync::Cache;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use taskhub_config::StoreConfig;
use taskhub_core::AuthUser;
use url::Url;

use crate::StoreError;

/// How long a verified token stays trusted without re-checking upstream
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(60);
const TOKEN_CACHE_CAPACITY: u64 = 10_000;

/// Client for the hosted Postgres/auth service
#[derive(Clone)]
pub struct Store {
    http: reqwest::Client,
    base: Url,
    anon_key: SecretString,
    verified: Cache<String, AuthUser>,
}

impl Store {
    /// Create a store client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &StoreConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;

        let verified = Cache::builder()
            .time_to_live(TOKEN_CACHE_TTL)
            .max_capacity(TOKEN_CACHE_CAPACITY)
            .build();

        Ok(Self {
            http,
            base: config.url.clone(),
            anon_key: config.anon_key.clone(),
            verified,
        })
    }

    /// Verify an access token against the auth provider
    ///
    /// Successful verifications are cached briefly so hot clients don't
    /// hit the provider on every request.
    ///
    /// # Errors
    ///
    /// `InvalidToken` when the provider rejects the token; `Upstream` or
    /// `Transport` when verification could not be performed
    pub async fn verify_token(&self, token: &str) -> Result<AuthUser, StoreError> {
        let cache_key = sha256_hex(token);
        if let Some(user) = self.verified.get(&cache_key) {
            return Ok(user);
        }

        let url = self.endpoint("/auth/v1/user")?;
        let response = self
            .http
            .get(url)
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::InvalidToken);
        }
        if !status.is_success() {
            return Err(upstream(response).await);
        }

        let user: AuthUser = response.json().await?;
        self.verified.insert(cache_key, user.clone());
        Ok(user)
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base.join(path).map_err(|e| StoreError::Upstream {
            status: 0,
            message: e.to_string(),
        })
    }

    /// Request builder pre-loaded with the service key headers
    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(self.anon_key.expose_secret())
    }
}

/// Drain an error response into a typed upstream error
pub(crate) async fn upstream(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    StoreError::Upstream { status, message }
}

/// Cache keys are digests; the raw token never sits in the cache
fn sha256_hex(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
