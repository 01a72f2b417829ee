//! Configuration builder for tests

use secrecy::SecretString;
use taskhub_config::{
    Config, Dsn, Environment, LogIngestConfig, ReporterConfig, ServerConfig, StoreConfig,
};
use url::Url;

/// Builds a minimal test configuration pointed at mock collaborators
pub struct ConfigBuilder {
    environment: Environment,
    store_url: String,
    dsn: Option<String>,
    sample_rate: f64,
    ingest_url: Option<String>,
}

impl ConfigBuilder {
    /// Create a new builder wired to the given mock store
    pub fn new(store_url: &str) -> Self {
        Self {
            environment: Environment::Test,
            store_url: store_url.to_owned(),
            dsn: None,
            sample_rate: 1.0,
            ingest_url: None,
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Enable crash reporting against the given DSN
    pub fn with_reporter(mut self, dsn: &str) -> Self {
        self.dsn = Some(dsn.to_owned());
        self
    }

    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Enable request-log forwarding against the given ingest API
    pub fn with_log_ingest(mut self, base_url: &str) -> Self {
        self.ingest_url = Some(base_url.to_owned());
        self
    }

    pub fn build(self) -> Config {
        let reporter = self.dsn.map(|dsn| ReporterConfig {
            dsn: Dsn::parse(&dsn).expect("test DSN"),
            environment: self.environment.as_str().to_owned(),
            release: None,
            sample_rate: self.sample_rate,
        });

        let log_ingest = self.ingest_url.map(|base_url| LogIngestConfig {
            token: SecretString::from("test-token"),
            dataset: "test-requests".to_owned(),
            base_url: Url::parse(&base_url).expect("test ingest URL"),
        });

        Config {
            environment: self.environment,
            server: ServerConfig { listen_address: None },
            reporter,
            log_ingest,
            store: StoreConfig {
                url: Url::parse(&self.store_url).expect("test store URL"),
                anon_key: SecretString::from("test-anon-key"),
            },
        }
    }
}
