//! Common test utilities for E2E tests

use frontdesk::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    /// Client with redirects disabled, so 302s stay observable
    pub client: reqwest::Client,
}

/// Token signing secret shared by every test server
pub const TEST_SECRET: &str = "test-secret-key-32-bytes-long!!!";

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "localhost".to_string(),
                protocol: "http".to_string(),
            },
            database: config::DatabaseConfig { path: db_path },
            auth: config::AuthConfig {
                token_secret: TEST_SECRET.to_string(),
                token_ttl_seconds: 7200,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        frontdesk::metrics::init_metrics();

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client; redirects are never followed so the tests
        // can assert on status and Location directly
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = frontdesk::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Sign up a user and return the value of the issued token cookie
    pub async fn signup(&self, username: &str, password: &str) -> String {
        let response = self
            .client
            .post(self.url("/signup"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("signup request succeeds");

        assert_eq!(
            response.status(),
            302,
            "signup should redirect, got {}",
            response.status()
        );

        extract_cookie(&response, "token").expect("signup sets the token cookie")
    }
}

/// Pull a cookie value out of a response's Set-Cookie headers
pub fn extract_cookie(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| {
            let (pair, _) = value.split_once(';').unwrap_or((value, ""));
            let (cookie_name, cookie_value) = pair.split_once('=')?;
            (cookie_name == name && !cookie_value.is_empty()).then(|| cookie_value.to_string())
        })
}

/// The Location header of a redirect response
pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .expect("redirect carries a Location header")
}
