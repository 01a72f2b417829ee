use std::collections::HashMap;
use std::sync::OnceLock;

use taskhub_config::ReporterConfig;
use taskhub_core::{AppError, RequestContext};

/// Headers whose values never leave the process
const REDACTED_HEADERS: &[&str] = &["authorization", "cookie", "apikey", "x-api-key"];

/// Request context attached to a crash report
///
/// Built from the current request at error time; lives for one reporting
/// call.
#[derive(Debug, Clone)]
pub struct TelemetryContext {
    pub url: String,
    pub method: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub user_id: Option<String>,
}

impl TelemetryContext {
    /// Assemble the reportable view of a request
    ///
    /// Credential-bearing headers are redacted rather than dropped so a
    /// report still shows they were present.
    pub fn from_request(context: &RequestContext) -> Self {
        let query = context
            .parts
            .uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        let headers = context
            .headers()
            .iter()
            .map(|(name, value)| {
                let name = name.as_str().to_owned();
                let value = if REDACTED_HEADERS.contains(&name.as_str()) {
                    "[redacted]".to_owned()
                } else {
                    String::from_utf8_lossy(value.as_bytes()).into_owned()
                };
                (name, value)
            })
            .collect();

        Self {
            url: context.parts.uri.to_string(),
            method: context.parts.method.to_string(),
            query,
            headers,
            user_id: context.user_id().map(str::to_owned),
        }
    }
}

/// Forwards normalized errors to an external crash-monitoring collaborator
///
/// Implementations must be best-effort: reporting never affects the
/// response sent to the client.
pub trait ErrorReporter: Send + Sync {
    /// Report one error with its request context, fire-and-forget
    fn report(&self, error: &AppError, context: &TelemetryContext);
}

/// [`ErrorReporter`] that delivers events to the DSN's store endpoint
pub struct DsnReporter {
    config: ReporterConfig,
    // Built at most once per process; the runtime is multi-threaded so
    // construction must be guarded.
    client: OnceLock<reqwest::Client>,
}

impl DsnReporter {
    pub const fn new(config: ReporterConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> &reqwest::Client {
        self.client.get_or_init(reqwest::Client::new)
    }

    fn build_event(&self, error: &AppError, context: &TelemetryContext) -> serde_json::Value {
        serde_json::json!({
            "timestamp": jiff::Timestamp::now().to_string(),
            "level": "error",
            "environment": self.config.environment,
            "release": self.config.release,
            "message": error.message(),
            "extra": {
                "code": error.code(),
                "status": error.status().as_u16(),
            },
            "request": {
                "url": context.url,
                "method": context.method,
                "query": context.query,
                "headers": context.headers,
            },
            "user": context.user_id.as_ref().map(|id| serde_json::json!({ "id": id })),
        })
    }
}

impl ErrorReporter for DsnReporter {
    fn report(&self, error: &AppError, context: &TelemetryContext) {
        // Sampling gate: a rate of 1.0 always sends, 0.0 never does
        if rand::random::<f64>() >= self.config.sample_rate {
            return;
        }

        let event = self.build_event(error, context);
        let endpoint = self.config.dsn.store_endpoint();
        let auth = format!(
            "Sentry sentry_version=7, sentry_key={}",
            self.config.dsn.public_key()
        );
        let client = self.client().clone();

        tokio::spawn(async move {
            let result = client
                .post(&endpoint)
                .header("X-Sentry-Auth", auth)
                .json(&event)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);

            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to deliver crash report");
            }
        });
    }
}
