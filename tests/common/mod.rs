use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use rptgis_api::auth::{generate_jwt, Claims, UserType};

static SERVER: OnceLock<TestServer> = OnceLock::new();

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
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/rptgis-api");
        cmd.env("RPTGIS_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees the same DATABASE_URL and
        // APP_ENV as this process; tokens minted here must verify there.
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
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Health reports 503 when the directory database is down;
                    // the router is serving either way.
                    if resp.status() == StatusCode::OK
                        || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                    {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Mint a token for a regular user. Signed with the same secret the spawned
/// server resolves, so it passes JWT validation without a login round trip.
#[allow(dead_code)]
pub fn user_token() -> String {
    let claims = Claims::new(990_001, UserType::User, "itest_user".to_string());
    generate_jwt(&claims).expect("mint user token")
}

#[allow(dead_code)]
pub fn admin_token() -> String {
    let claims = Claims::new(990_002, UserType::Admin, "itest_admin".to_string());
    generate_jwt(&claims).expect("mint admin token")
}

/// A token whose expiry is already in the past.
#[allow(dead_code)]
pub fn expired_token() -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        user_id: 990_003,
        user_type: UserType::User,
        user_name: "itest_expired".to_string(),
        exp: now - 3600,
        iat: now - 7200,
    };
    generate_jwt(&claims).expect("mint expired token")
}
