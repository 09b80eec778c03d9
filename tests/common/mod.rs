use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use camwatch_api::auth::TokenService;
use camwatch_api::config::SecurityConfig;

/// Signing secrets handed to the spawned server so tests can mint their own
/// tokens and have them accepted.
pub const ACCESS_SECRET: &str = "integration-access-secret";
pub const REFRESH_SECRET: &str = "integration-refresh-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/camwatch-api");
        cmd.env("PORT", port.to_string())
            .env("JWT_ACCESS_SECRET", ACCESS_SECRET)
            .env("JWT_REFRESH_SECRET", REFRESH_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Degraded (no database) still counts as up for these tests
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Reap the spawned server so test runs don't leave processes behind
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn a server on a free port and wait for it to answer `/health`.
/// Each caller owns its server; it is killed when the handle drops.
pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Token service configured with the same secrets as the spawned server.
pub fn token_service() -> TokenService {
    TokenService::new(&SecurityConfig {
        access_token_secret: ACCESS_SECRET.to_string(),
        refresh_token_secret: REFRESH_SECRET.to_string(),
        access_token_ttl_secs: 900,
        refresh_token_ttl_secs: 604800,
        secure_cookies: false,
    })
}

/// Token service whose tokens are already expired when issued.
pub fn expired_token_service() -> TokenService {
    TokenService::new(&SecurityConfig {
        access_token_secret: ACCESS_SECRET.to_string(),
        refresh_token_secret: REFRESH_SECRET.to_string(),
        access_token_ttl_secs: -120,
        refresh_token_ttl_secs: -120,
        secure_cookies: false,
    })
}
