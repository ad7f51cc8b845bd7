//! Harness for exercising the pagination loader against a live HTTP server.

pub mod mock;
pub mod server;
pub mod store;
pub mod telemetry;

pub use server::{Config, MAX_PAGE_LIMIT};
pub use store::{MockReply, MockStore, RecordedRequest};

use payloads::{APIClient, StatusCode};
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub const PLAYERS: &str = "/api/players";
pub const SCOUTS: &str = "/api/scouts";
pub const REPORTS: &str = "/api/reports";

pub struct TestApp {
    #[allow(unused)]
    pub port: u16,
    pub client: APIClient,
    pub store: MockStore,
}

impl TestApp {
    /// A fresh client pointed at this server.
    pub fn api_client(&self) -> APIClient {
        APIClient {
            address: self.client.address.clone(),
            inner_client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.client.address)
    }
}

/// Start a server with an empty store on an OS-assigned port.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(MockStore::new()).await
}

pub async fn spawn_app_with(store: MockStore) -> TestApp {
    spawn_app_on_port(0, store).await
}

pub async fn spawn_app_on_port(port: u16, store: MockStore) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let mut config = Config {
        ip: "127.0.0.1".into(),
        port,
        allowed_origins: vec!["*".to_string()],
    };

    let server = server::build(&mut config, store.clone()).unwrap();
    tokio::spawn(server);

    TestApp {
        port: config.port,
        client: APIClient {
            address: format!("http://127.0.0.1:{}", config.port),
            inner_client: reqwest::Client::new(),
        },
        store,
    }
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}
