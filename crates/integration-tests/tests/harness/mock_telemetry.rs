//! Mock telemetry collaborators: crash-report store and log-ingest API
//!
//! Both sinks on one listener. Captured payloads are retained so tests
//! can assert on report counts and record contents; reporting is
//! fire-and-forget on the server side, so assertions go through
//! [`MockCollector::wait_for_events`] / [`MockCollector::wait_for_records`].

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub struct MockCollector {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<CollectorState>,
}

#[derive(Default)]
struct CollectorState {
    events: Mutex<Vec<Value>>,
    records: Mutex<Vec<Value>>,
}

impl MockCollector {
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(CollectorState::default());

        let app = Router::new()
            .route("/api/{project}/store/", routing::post(handle_event))
            .route("/v1/datasets/{dataset}/ingest", routing::post(handle_ingest))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// DSN pointing at this collector's event store
    pub fn dsn(&self) -> String {
        format!("http://publickey@{}/1", self.addr)
    }

    /// Base URL for the log-ingest API
    pub fn ingest_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn events(&self) -> Vec<Value> {
        self.state.events.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<Value> {
        self.state.records.lock().unwrap().clone()
    }

    /// Wait until at least `count` crash reports have arrived
    pub async fn wait_for_events(&self, count: usize) -> Vec<Value> {
        self.wait(count, &self.state.events).await
    }

    /// Wait until at least `count` log records have arrived
    pub async fn wait_for_records(&self, count: usize) -> Vec<Value> {
        self.wait(count, &self.state.records).await
    }

    async fn wait(&self, count: usize, bucket: &Mutex<Vec<Value>>) -> Vec<Value> {
        for _ in 0..100 {
            {
                let held = bucket.lock().unwrap();
                if held.len() >= count {
                    return held.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        bucket.lock().unwrap().clone()
    }
}

impl Drop for MockCollector {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_event(State(state): State<Arc<CollectorState>>, Json(event): Json<Value>) -> impl IntoResponse {
    state.events.lock().unwrap().push(event);
    (StatusCode::OK, Json(json!({ "id": "1" })))
}

async fn handle_ingest(State(state): State<Arc<CollectorState>>, Json(batch): Json<Vec<Value>>) -> StatusCode {
    state.records.lock().unwrap().extend(batch);
    StatusCode::OK
}
