//! Copr HTTP Client
//!
//! A small, type-safe client for the Copr build service API (v1).
//!
//! The client knows two operations: scheduling a build of a source package
//! and asking for the status of scheduled builds. Both go through the
//! [`BuildService`] trait so callers can be tested without a network.
//!
//! # Example
//!
//! ```no_run
//! use copr_client::CoprClient;
//! use copr_core::{Secret, dto::build::NewBuild};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CoprClient::new(
//!         "https://copr.fedoraproject.org",
//!         Secret::new("login"),
//!         Secret::new("token"),
//!     );
//!
//!     let handle = client
//!         .schedule_build(&NewBuild::new("msrb", "jenkins", "https://example.com/foo.src.rpm"))
//!         .await?;
//!
//!     println!("Scheduled build(s): {}", handle);
//!     Ok(())
//! }
//! ```

mod builds;
pub mod error;
mod service;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use service::BuildService;

use copr_core::Secret;
use copr_core::dto::response::CoprResponse;
use reqwest::Client;

/// HTTP client for the Copr API
#[derive(Debug, Clone)]
pub struct CoprClient {
    /// Base URL of the Copr frontend (e.g., "https://copr.fedoraproject.org")
    base_url: String,
    /// API login, sent as the basic-auth user name
    login: Secret,
    /// API token, sent as the basic-auth password
    token: Secret,
    /// HTTP client instance
    client: Client,
}

impl CoprClient {
    /// Create a new Copr client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Copr frontend
    /// * `login` - API login from the Copr API page
    /// * `token` - API token from the Copr API page
    ///
    /// # Example
    /// ```
    /// use copr_client::CoprClient;
    /// use copr_core::Secret;
    ///
    /// let client = CoprClient::new("https://copr.fedoraproject.org", Secret::new("l"), Secret::new("t"));
    /// ```
    pub fn new(base_url: impl Into<String>, login: Secret, token: Secret) -> Self {
        Self::with_client(base_url, login, token, Client::new())
    }

    /// Create a new Copr client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        login: Secret,
        token: Secret,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            login,
            token,
            client,
        }
    }

    /// Get the base URL of the Copr frontend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the endpoint that schedules builds in `owner/project`
    pub fn new_build_url(&self, owner: &str, project: &str) -> String {
        format!("{}/api/coprs/{}/{}/new_build/", self.base_url, owner, project)
    }

    /// URL of the endpoint that reports the status of one build
    pub fn build_status_url(&self, build_id: &str) -> String {
        format!("{}/api/coprs/build_status/{}/", self.base_url, build_id)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Decode a Copr response and insist on `output == "ok"`
    ///
    /// Copr reports most failures with a JSON body even on 4xx/5xx, so the
    /// body is decoded before the status code decides the error variant.
    async fn handle_response(&self, response: reqwest::Response) -> Result<CoprResponse> {
        let status = response.status();
        let body = response.text().await?;

        let decoded = serde_json::from_str::<CoprResponse>(&body);

        if !status.is_success() {
            let message = match decoded {
                Ok(payload) => payload.failure_reason(),
                Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
                Err(_) => body.trim().to_string(),
            };
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let payload = decoded
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        if !payload.is_ok() {
            return Err(ClientError::Rejected(payload.failure_reason()));
        }

        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    pub(crate) fn client(base_url: &str) -> CoprClient {
        // Tests talk to 127.0.0.1; keep any proxy from the environment out of the way
        let http_client = Client::builder().no_proxy().build().unwrap();
        CoprClient::with_client(
            base_url,
            Secret::new("api-login"),
            Secret::new("api-token"),
            http_client,
        )
    }

    /// Serves exactly one canned HTTP response and hands back the raw request
    pub(crate) async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let (base_url, server) = serve_sequence(&[(status_line, body)]).await;
        let handle = tokio::spawn(async move { server.await.unwrap().remove(0) });
        (base_url, handle)
    }

    /// Serves the canned responses in order, one connection each, and hands
    /// back the raw requests
    pub(crate) async fn serve_sequence(
        responses: &[(&str, &str)],
    ) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let responses: Vec<String> = responses
            .iter()
            .map(|(status_line, body)| {
                format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                )
            })
            .collect();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::with_capacity(responses.len());
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            requests
        });

        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_client_creation() {
        let c = client("https://copr.example.org");
        assert_eq!(c.base_url(), "https://copr.example.org");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let c = client("https://copr.example.org/");
        assert_eq!(c.base_url(), "https://copr.example.org");
    }

    #[test]
    fn test_endpoint_urls() {
        let c = client("https://copr.example.org/");
        assert_eq!(
            c.new_build_url("msrb", "jenkins"),
            "https://copr.example.org/api/coprs/msrb/jenkins/new_build/"
        );
        assert_eq!(
            c.build_status_url("4711"),
            "https://copr.example.org/api/coprs/build_status/4711/"
        );
    }

    #[test]
    fn test_debug_output_hides_credentials() {
        let rendered = format!("{:?}", client("https://copr.example.org"));
        assert!(!rendered.contains("api-login"));
        assert!(!rendered.contains("api-token"));
    }
}
