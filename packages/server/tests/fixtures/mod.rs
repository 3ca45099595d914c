//! In-process test server fixture.

use std::time::Duration;

/// Relay server running in a background task of the test runtime.
///
/// Uses an in-memory SQLite database, so every test server starts with an
/// empty history.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Start a relay on the given port. Ports must be unique per test.
    pub fn start(port: u16) -> Self {
        tokio::spawn(async move {
            if let Err(e) =
                irori_server::run_server("127.0.0.1".to_string(), port, "sqlite::memory:").await
            {
                eprintln!("Test server error: {}", e);
            }
        });
        Self { port }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    /// Block until the health endpoint answers
    pub async fn wait_ready(&self) {
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if let Ok(response) = client
                .get(format!("{}/api/health", self.base_url()))
                .send()
                .await
                && response.status() == 200
            {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("Server did not become ready on port {}", self.port);
    }
}
