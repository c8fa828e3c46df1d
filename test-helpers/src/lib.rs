pub mod mock;
mod server;

use payloads::{APIClient, AuthSession, ClientError};
use reqwest::StatusCode;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, prelude::*};

pub use fetcher::time::TimeSource;
pub use server::TEST_TOKEN;

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: APIClient,
    pub session: AuthSession,
}

impl TestApp {
    pub fn address(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Log in as the mock user, storing the bearer token in the session.
    pub async fn login_alice(&self) -> anyhow::Result<()> {
        self.client.login(&mock::alice_credentials()).await?;
        Ok(())
    }
}

/// Start the mock backend on an OS-assigned port (for parallel testing)
/// and return a client wired to it.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_flaky(0).await
}

/// Like [`spawn_app`], with `/api/flaky` failing `flaky_failures` times
/// before it starts succeeding.
pub async fn spawn_app_with_flaky(flaky_failures: u32) -> TestApp {
    init_telemetry();

    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("failed to bind test listener");
    let port = listener.local_addr().unwrap().port();
    let server = server::build(listener, flaky_failures)
        .expect("failed to build mock server");
    tokio::spawn(server);
    tracing::debug!(port, "mock backend listening");

    let session = AuthSession::new();
    let client =
        APIClient::new(format!("http://127.0.0.1:{port}"), session.clone());
    TestApp {
        port,
        client,
        session,
    }
}

fn init_telemetry() {
    let filter =
        std::env::var("TEST_LOG").unwrap_or_else(|_| "error".to_string());
    let _ = LogTracer::init();
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Assert that the result of an API action results in a specific status
/// code.
pub fn assert_status_code<T>(
    result: Result<T, ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(ClientError::Api(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}
