use url::Url;

/// Crash-reporting configuration
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Ingestion DSN for the monitoring collaborator
    pub dsn: Dsn,
    /// Environment name attached to reports (defaults to the deployment
    /// environment)
    pub environment: String,
    /// Release identifier attached to reports
    pub release: Option<String>,
    /// Fraction of errors actually transmitted, in [0, 1]
    pub sample_rate: f64,
}

/// Parsed crash-reporting DSN
///
/// Shaped like `https://{public_key}@{host}/{project_id}`. Any well-formed
/// URL is accepted; the host is deliberately not checked against a
/// vendor-specific ingest pattern, only the two pieces the store-endpoint
/// derivation needs: a non-empty public key (URL username) and a non-empty
/// final path segment (project id).
#[derive(Debug, Clone)]
pub struct Dsn {
    url: Url,
    project_id: String,
}

impl Dsn {
    /// Parse and validate a DSN string
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a URL, has no public key, or
    /// has no project id path segment
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let url = Url::parse(raw).map_err(|e| anyhow::anyhow!("invalid DSN: {e}"))?;

        if url.username().is_empty() {
            anyhow::bail!("invalid DSN: missing public key");
        }

        let project_id = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("invalid DSN: missing project id"))?;

        Ok(Self { url, project_id })
    }

    /// Public key used to authenticate against the ingestion host
    pub fn public_key(&self) -> &str {
        self.url.username()
    }

    /// Project id the DSN points at
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Event-store endpoint derived from the DSN
    pub fn store_endpoint(&self) -> String {
        let scheme = self.url.scheme();
        let host = self.url.host_str().unwrap_or_default();
        let port = self.url.port().map(|p| format!(":{p}")).unwrap_or_default();
        format!("{scheme}://{host}{port}/api/{}/store/", self.project_id)
    }
}
