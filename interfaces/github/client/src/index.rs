use std::time::Duration;

use reqwest::{header::HeaderMap, Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::link;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Pause after every request, keeps us under the anonymous/authenticated ceilings.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Wait before the single retry of a rate-limited request.
pub const DEFAULT_RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);

/// Star listings only carry `starred_at` under this media type.
const ACCEPT: &str = "application/vnd.github.v3.star+json";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL relative paths are joined onto.
    pub api_base: String,
    /// Optional bearer token. Without one GitHub allows 60 requests/hour.
    pub token: Option<String>,
    pub request_delay: Duration,
    pub rate_limit_cooldown: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            request_delay: DEFAULT_REQUEST_DELAY,
            rate_limit_cooldown: DEFAULT_RATE_LIMIT_COOLDOWN,
            user_agent: concat!("stargazer-prospector/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Raw outcome of a GET. Non-200 statuses are data here, not errors.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: String,
    pub headers: HeaderMap,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Page number of the `rel="last"` link, when the listing is paginated.
    pub fn last_page(&self) -> Option<u32> {
        self.headers
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(link::last_page)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub struct GitHubClient {
    http: Client,
    config: ClientConfig,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self, BuildClientError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| BuildClientError::Build { source })?;

        Ok(Self { http, config })
    }

    pub fn is_authenticated(&self) -> bool {
        self.config.token.is_some()
    }

    /// Resolves `path` against the API base; absolute URLs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET with throttling and a single cooldown retry on rate limiting.
    ///
    /// Any status, including a second rate-limit answer, is handed back to
    /// the caller. Only transport failures are errors.
    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<FetchResponse, FetchError> {
        let url = self.url(path);

        let response = self.send_once(&url, params).await?;
        if !is_rate_limited(response.status) {
            return Ok(response);
        }

        warn!(
            %url,
            status = response.status.as_u16(),
            cooldown_secs = self.config.rate_limit_cooldown.as_secs_f64(),
            "rate limited, waiting before retry"
        );
        tokio::time::sleep(self.config.rate_limit_cooldown).await;

        self.send_once(&url, params).await
    }

    async fn send_once(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<FetchResponse, FetchError> {
        let mut request = self
            .http
            .get(url)
            .query(params)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let result = request.send().await;
        let fetched = match result {
            Ok(response) => {
                let status = response.status();
                let headers = response.headers().clone();
                response
                    .text()
                    .await
                    .map(|body| FetchResponse { status, body, headers })
                    .map_err(|source| FetchError::ResponseRead {
                        url: url.to_string(),
                        source,
                    })
            }
            Err(source) => Err(FetchError::RequestSend {
                url: url.to_string(),
                source,
            }),
        };

        tokio::time::sleep(self.config.request_delay).await;

        if let Ok(response) = &fetched {
            debug!(%url, status = response.status.as_u16(), "GET");
        }

        fetched
    }
}

fn is_rate_limited(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
}

#[derive(Debug, Error)]
pub enum BuildClientError {
    #[error("Build: {source}")]
    Build { source: reqwest::Error },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("RequestSend {url}: {source}")]
    RequestSend { url: String, source: reqwest::Error },

    #[error("ResponseRead {url}: {source}")]
    ResponseRead { url: String, source: reqwest::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer, token: Option<&str>) -> GitHubClient {
        GitHubClient::new(ClientConfig {
            api_base: server.uri(),
            token: token.map(str::to_string),
            request_delay: Duration::ZERO,
            rate_limit_cooldown: Duration::from_millis(10),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_relative_paths() {
        let client = GitHubClient::new(ClientConfig {
            api_base: "https://api.example.com/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();

        assert_eq!(client.url("/users/octocat"), "https://api.example.com/users/octocat");
        assert_eq!(client.url("users/octocat"), "https://api.example.com/users/octocat");
        assert_eq!(client.url("https://other.example.com/x"), "https://other.example.com/x");
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_delay, Duration::from_millis(500));
        assert_eq!(config.rate_limit_cooldown, Duration::from_secs(60));
        assert!(config.token.is_none());
    }

    #[tokio::test]
    async fn test_get_returns_status_body_and_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widget/stargazers"))
            .and(query_param("page", "2"))
            .and(header("accept", ACCEPT))
            .and(header("x-github-api-version", API_VERSION))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .insert_header(
                        "link",
                        r#"<https://api.github.com/repositories/1/stargazers?page=7>; rel="last""#,
                    ),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, None);
        let response = client
            .get("repos/acme/widget/stargazers", &[("page", "2".to_string())])
            .await
            .unwrap();

        assert!(response.is_ok());
        assert_eq!(response.body, "[]");
        assert_eq!(response.last_page(), Some(7));
    }

    #[tokio::test]
    async fn test_token_is_sent_as_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Some("s3cret"));
        assert!(client.is_authenticated());

        let response = client.get("users/octocat", &[]).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_retries_once_then_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(403))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"login":"octocat"}"#))
            .mount(&server)
            .await;

        let client = test_client(&server, None);
        let response = client.get("users/octocat", &[]).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_retries_exactly_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(429))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server, None);
        let response = client.get("users/octocat", &[]).await.unwrap();

        assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_cooldown_and_request_delay_are_waited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(403))
            .expect(2)
            .mount(&server)
            .await;

        let request_delay = Duration::from_millis(100);
        let cooldown = Duration::from_millis(300);
        let client = GitHubClient::new(ClientConfig {
            api_base: server.uri(),
            request_delay,
            rate_limit_cooldown: cooldown,
            ..ClientConfig::default()
        })
        .unwrap();

        let started = std::time::Instant::now();
        let response = client.get("users/octocat", &[]).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert!(
            elapsed >= cooldown + 2 * request_delay,
            "returned after {elapsed:?}"
        );
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_request_delay_follows_every_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(3)
            .mount(&server)
            .await;

        let request_delay = Duration::from_millis(100);
        let client = GitHubClient::new(ClientConfig {
            api_base: server.uri(),
            request_delay,
            ..ClientConfig::default()
        })
        .unwrap();

        let started = std::time::Instant::now();
        for _ in 0..3 {
            client.get("users/octocat", &[]).await.unwrap();
        }

        assert!(started.elapsed() >= 3 * request_delay);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, None);
        let response = client.get("users/ghost", &[]).await.unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, "Not Found");
        assert!(!response.is_ok());
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let client = GitHubClient::new(ClientConfig {
            api_base: "http://127.0.0.1:1".to_string(),
            request_delay: Duration::ZERO,
            ..ClientConfig::default()
        })
        .unwrap();

        let result = client.get("users/octocat", &[]).await;
        assert!(matches!(result, Err(FetchError::RequestSend { .. })));
    }
}
