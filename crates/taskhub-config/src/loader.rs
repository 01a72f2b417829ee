use secrecy::SecretString;
use url::Url;

use crate::{Config, Dsn, Environment, LogIngestConfig, ReporterConfig, ServerConfig, StoreConfig};

/// Default base URL for the log-ingestion collaborator
const DEFAULT_INGEST_URL: &str = "https://api.axiom.co";

impl Config {
    /// Load and validate configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown environment name, an unparsable
    /// listen address, a malformed DSN, an out-of-range sample rate, a
    /// half-configured log sink, or a missing/invalid store URL or key
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = match optional("TASKHUB_ENV") {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };

        let listen_address = optional("TASKHUB_LISTEN_ADDRESS")
            .map(|raw| {
                raw.parse()
                    .map_err(|e| anyhow::anyhow!("invalid TASKHUB_LISTEN_ADDRESS '{raw}': {e}"))
            })
            .transpose()?;

        let reporter = load_reporter(environment)?;
        let log_ingest = load_log_ingest()?;
        let store = load_store()?;

        Ok(Self {
            environment,
            server: ServerConfig { listen_address },
            reporter,
            log_ingest,
            store,
        })
    }
}

/// Crash reporting is enabled by presence of a DSN; the remaining fields
/// default from the deployment environment
fn load_reporter(environment: Environment) -> anyhow::Result<Option<ReporterConfig>> {
    let Some(raw_dsn) = optional("SENTRY_DSN") else {
        return Ok(None);
    };

    let dsn = Dsn::parse(&raw_dsn)?;

    let sample_rate = match optional("SENTRY_SAMPLE_RATE") {
        Some(raw) => {
            let rate: f64 = raw
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid SENTRY_SAMPLE_RATE '{raw}': {e}"))?;
            if !(0.0..=1.0).contains(&rate) {
                anyhow::bail!("SENTRY_SAMPLE_RATE must be in [0, 1], got {rate}");
            }
            rate
        }
        None => environment.default_sample_rate(),
    };

    Ok(Some(ReporterConfig {
        dsn,
        environment: optional("SENTRY_ENVIRONMENT").unwrap_or_else(|| environment.to_string()),
        release: optional("SENTRY_RELEASE"),
        sample_rate,
    }))
}

/// Log forwarding needs both the token and the dataset; one without the
/// other is treated as a malformed deployment
fn load_log_ingest() -> anyhow::Result<Option<LogIngestConfig>> {
    let token = optional("AXIOM_TOKEN");
    let dataset = optional("AXIOM_DATASET");

    let (token, dataset) = match (token, dataset) {
        (Some(token), Some(dataset)) => (token, dataset),
        (None, None) => return Ok(None),
        (Some(_), None) => anyhow::bail!("AXIOM_TOKEN is set but AXIOM_DATASET is missing"),
        (None, Some(_)) => anyhow::bail!("AXIOM_DATASET is set but AXIOM_TOKEN is missing"),
    };

    let base_url = optional("AXIOM_URL").unwrap_or_else(|| DEFAULT_INGEST_URL.to_owned());
    let base_url = Url::parse(&base_url).map_err(|e| anyhow::anyhow!("invalid AXIOM_URL '{base_url}': {e}"))?;

    Ok(Some(LogIngestConfig {
        token: SecretString::from(token),
        dataset,
        base_url,
    }))
}

fn load_store() -> anyhow::Result<StoreConfig> {
    let url = required("SUPABASE_URL")?;
    let url = Url::parse(&url).map_err(|e| anyhow::anyhow!("invalid SUPABASE_URL '{url}': {e}"))?;
    let anon_key = required("SUPABASE_ANON_KEY")?;

    Ok(StoreConfig {
        url,
        anon_key: SecretString::from(anon_key),
    })
}

/// Read a variable, treating unset and empty identically
fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &str) -> anyhow::Result<String> {
    optional(name).ok_or_else(|| anyhow::anyhow!("required environment variable {name} is not set"))
}
