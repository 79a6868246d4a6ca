//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up packs and a session directory on disk
//! - Helpers for driving sessions through the API

pub mod fixtures;

use std::path::PathBuf;

use axum::Router;
use axum_test::TestServer;
use serde_json::Value;
use tempfile::TempDir;

use quiz_practice_backend::config::Config;
use quiz_practice_backend::{router, AppState};

/// Test context owning a temporary data directory.
///
/// Packs are written as files and listed in a manifest, then loaded through
/// the same path the server uses at startup.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Create a context serving the given packs, as (file name, content).
    ///
    /// # Panics
    /// Panics if the packs cannot be written or loaded.
    pub async fn new(packs: &[(&str, String)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        for (name, content) in packs {
            std::fs::write(dir.path().join(name), content).expect("Failed to write pack");
        }
        let names: Vec<&str> = packs.iter().map(|(name, _)| *name).collect();
        std::fs::write(
            dir.path().join("packs.json"),
            serde_json::json!({ "packs": names }).to_string(),
        )
        .expect("Failed to write manifest");

        let state = AppState::init(Self::config_for(&dir))
            .await
            .expect("Failed to initialize app state");
        let app = router(state.clone());

        Self { dir, state, app }
    }

    /// Context serving a single multiple-choice question.
    pub async fn with_mcq() -> Self {
        Self::new(&[("arithmetic.json", fixtures::mcq_pack())]).await
    }

    /// Configuration pointing at this context's data directory.
    pub fn config_for(dir: &TempDir) -> Config {
        Config {
            packs_manifest: dir.path().join("packs.json"),
            session_dir: dir.path().join("sessions"),
            sprint_length: 5,
            ..Config::default()
        }
    }

    pub fn session_dir(&self) -> PathBuf {
        self.dir.path().join("sessions")
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }
}

/// Start a session and return its ID and response body.
pub async fn start_session(
    server: &TestServer,
    mode: &str,
    length: Option<usize>,
) -> (String, Value) {
    let response = server
        .post("/api/sessions")
        .json(&fixtures::start_request(mode, length))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let id = body["id"].as_str().expect("session id").to_string();
    (id, body)
}

/// Advance a session and return the response body.
pub async fn advance(server: &TestServer, id: &str, answer: Option<Value>) -> Value {
    let response = server
        .post(&format!("/api/sessions/{id}/advance"))
        .json(&fixtures::advance_request(answer))
        .await;
    response.assert_status_ok();
    response.json()
}
