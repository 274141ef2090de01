//! Common test utilities for control API testing with mocks.
//!
//! Builds the same router the binary serves, backed by a SQLite settings
//! store in a temp dir, a mock remote transport and a mock print sink.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio::runtime::Handle;
use tower::ServiceExt;

use kitchenprint_core::{
    create_notice_system, load_config_from_str, ConfigStore, PeriodicScheduler, PipelineConfig,
    PrintPipeline, SecretCipher, SqliteConfigStore,
    testing::{MockPrintSink, MockTransport},
};

/// Re-export fixtures for test convenience
pub use kitchenprint_core::testing::fixtures;

/// Test fixture with an in-process router and controllable collaborators.
pub struct TestFixture {
    pub router: Router,
    pub transport: MockTransport,
    pub sink: MockPrintSink,
    pub store: Arc<SqliteConfigStore>,
    pub scheduler: Arc<PeriodicScheduler>,
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with printers `Kitchen1` and `Kitchen2` available.
    pub async fn new() -> Self {
        Self::with_devices(&["Kitchen1", "Kitchen2"]).await
    }

    pub async fn with_devices(devices: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = load_config_from_str(
            r#"
[storage]
secret_key = "test pepper"

[printing]
backend = "log"
"#,
        )
        .expect("Failed to parse test config");
        config.storage.path = temp_dir.path().join("settings.db");
        config.printing.staging_dir = temp_dir.path().join("staging");

        let cipher = SecretCipher::from_passphrase(&config.storage.secret_key)
            .expect("Failed to create cipher");
        let store = Arc::new(
            SqliteConfigStore::new(&config.storage.path, cipher)
                .expect("Failed to create settings store"),
        );

        let transport = MockTransport::new();
        let sink = MockPrintSink::with_devices(devices);

        let (notify, writer, recent) = create_notice_system(256, 100);
        tokio::spawn(writer.run());

        let pipeline = Arc::new(PrintPipeline::new(
            PipelineConfig::from(&config),
            Arc::clone(&store) as Arc<dyn ConfigStore>,
            Arc::new(transport.clone()),
            Arc::new(sink.clone()),
            notify.clone(),
        ));
        let scheduler =
            Arc::new(PeriodicScheduler::new(Handle::current()).with_notifier(notify.clone()));

        let state = Arc::new(kitchenprint_server::state::AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn ConfigStore>,
            Arc::new(sink.clone()),
            pipeline,
            Arc::clone(&scheduler),
            notify,
            recent,
        ));

        let router = kitchenprint_server::api::create_router(state);

        Self {
            router,
            transport,
            sink,
            store,
            scheduler,
            temp_dir,
        }
    }

    /// Save complete connection settings through the API.
    pub async fn configure(&self, targets: &[&str]) -> TestResponse {
        self.put(
            "/api/v1/settings",
            serde_json::json!({
                "server": fixtures::SERVER,
                "username": fixtures::USERNAME,
                "password": fixtures::PASSWORD,
                "interval": 60,
                "targets": targets,
            }),
        )
        .await
    }

    /// Poll until `count` remote deletes have happened.
    pub async fn wait_for_deletes(&self, count: usize) {
        for _ in 0..200 {
            if self.transport.deleted().await.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {} deletes", count);
    }

    /// Poll the notices endpoint until one equals `text`.
    pub async fn wait_for_notice(&self, text: &str) -> bool {
        for _ in 0..200 {
            let response = self.get("/api/v1/notices").await;
            if let Some(notices) = response.body.as_array() {
                if notices.iter().any(|n| n["text"] == text) {
                    return true;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
