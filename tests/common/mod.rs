#![allow(dead_code)]

use anyhow::{Context, Result};
use landlord_api::auth::{generate_jwt, Claims};
use landlord_api::config::AppConfig;
use landlord_api::repository::Repository;
use landlord_api::{app, AppState};
use serde_json::Value;

pub const JWT_SECRET: &str = "integration-test-secret";

/// A server on a real socket, running on the calling test's runtime.
/// It stops when that runtime shuts down at the end of the test.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Bind an unused port and serve the full router over a fresh in-memory store
pub async fn start_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    let router = app(AppState::new(Repository::in_memory(), JWT_SECRET), &config);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
    })
}

/// Fresh identity per test so rows never collide across tests
pub fn new_user() -> String {
    format!("user-{}", uuid::Uuid::new_v4())
}

pub fn token_for(user_id: &str) -> String {
    let mut claims = Claims::new(user_id, 1);
    claims.email = Some(format!("{}@example.com", user_id));
    generate_jwt(&claims, JWT_SECRET).expect("token")
}

/// `data` out of a success envelope
pub fn data(body: &Value) -> &Value {
    assert_eq!(body["success"], true, "not a success envelope: {}", body);
    &body["data"]
}
