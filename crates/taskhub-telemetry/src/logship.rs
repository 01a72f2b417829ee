use std::sync::OnceLock;

use secrecy::ExposeSecret;
use serde::Serialize;
use taskhub_config::LogIngestConfig;

/// One structured record per completed request
///
/// Created on response completion, forwarded, and dropped; never persisted
/// locally.
#[derive(Debug, Clone, Serialize)]
pub struct RequestLogRecord {
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    /// ISO-8601 completion time
    pub timestamp: String,
}

/// Forwards request-log records to an external log-ingestion collaborator
pub trait LogSink: Send + Sync {
    /// Forward one record, fire-and-forget
    fn ship(&self, record: RequestLogRecord);
}

/// [`LogSink`] that posts records to the ingestion API's dataset endpoint
pub struct IngestSink {
    config: LogIngestConfig,
    endpoint: String,
    client: OnceLock<reqwest::Client>,
}

impl IngestSink {
    pub fn new(config: LogIngestConfig) -> Self {
        let endpoint = format!(
            "{}/v1/datasets/{}/ingest",
            config.base_url.as_str().trim_end_matches('/'),
            config.dataset
        );

        Self {
            config,
            endpoint,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> &reqwest::Client {
        self.client.get_or_init(reqwest::Client::new)
    }
}

impl LogSink for IngestSink {
    fn ship(&self, record: RequestLogRecord) {
        let client = self.client().clone();
        let endpoint = self.endpoint.clone();
        let token = self.config.token.expose_secret().to_owned();

        tokio::spawn(async move {
            let result = client
                .post(&endpoint)
                .bearer_auth(token)
                .json(&[record])
                .send()
                .await
                .and_then(reqwest::Response::error_for_status);

            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to forward request log record");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn record_serializes_without_absent_fields() {
        let record = RequestLogRecord {
            method: "GET".to_owned(),
            path: "/health".to_owned(),
            status_code: 200,
            response_time_ms: 3,
            user_agent: None,
            client_ip: None,
            timestamp: "2026-01-01T00:00:00Z".to_owned(),
        };

        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["status_code"], 200);
        assert!(value.get("user_agent").is_none());
        assert!(value.get("client_ip").is_none());
    }

    #[test]
    fn endpoint_derived_from_base_url_and_dataset() {
        let sink = IngestSink::new(LogIngestConfig {
            token: SecretString::from("tok"),
            dataset: "requests".to_owned(),
            base_url: url::Url::parse("https://api.axiom.co").unwrap(),
        });

        assert_eq!(sink.endpoint, "https://api.axiom.co/v1/datasets/requests/ingest");
    }
}
