//! Proxy-routed page fetching
//!
//! `PageFetcher` abstracts the network so the scanner can be exercised
//! without a live proxy. `ProxyFetcher` is the `reqwest` implementation.

use crate::config::AppConfig;
use crate::monitoring::text::decode_html;
use crate::utils::AppError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Response of a page fetch, body already decoded to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Transport failure categories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    /// Refused, unreachable, or unresolvable (including dead onion addresses)
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

/// Page fetching interface
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the status and decoded body, whatever the status code
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Shared fetcher handle
pub type SharedFetcher = Arc<dyn PageFetcher>;

/// Build an HTTP client routed through `proxy_url` for both HTTP and HTTPS.
///
/// `None` builds a direct client that also ignores proxy environment variables.
pub fn build_client(
    proxy_url: Option<&str>,
    timeout: Duration,
    user_agent: &str,
) -> Result<reqwest::Client, AppError> {
    let mut builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent);

    builder = match proxy_url {
        Some(proxy) => builder.proxy(reqwest::Proxy::all(proxy)?),
        // Ignore HTTP_PROXY and friends from the environment
        None => builder.no_proxy(),
    };

    Ok(builder.build()?)
}

/// `reqwest` fetcher routed through the configured proxy
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: reqwest::Client,
}

impl ProxyFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build from configuration: per-site timeout and user agent
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = build_client(
            config.proxy_url.as_deref(),
            config.fetch_timeout,
            &config.user_agent,
        )?;
        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl PageFetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        debug!(url = %url, status = status, "Received response");

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        let body = decode_html(&bytes, content_type.as_deref());
        Ok(FetchedPage { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn direct_fetcher(timeout: Duration) -> ProxyFetcher {
        ProxyFetcher::new(build_client(None, timeout, "Mozilla/5.0").expect("client builds"))
    }

    #[tokio::test]
    async fn should_return_status_and_body() {
        // Arrange
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", "Mozilla/5.0")
            .with_status(200)
            .with_body("<p>hello</p>")
            .create_async()
            .await;
        let fetcher = direct_fetcher(Duration::from_secs(5));

        // Act
        let page = fetcher
            .fetch(&format!("{}/page", server.url()))
            .await
            .expect("fetch succeeds");

        // Assert
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<p>hello</p>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn should_decode_body_using_declared_charset() {
        // Arrange
        let mut server = mockito::Server::new_async().await;
        let (body, _, _) = encoding_rs::WINDOWS_1251.encode("<p>Свежая утечка базы</p>");
        server
            .mock("GET", "/forum")
            .with_status(200)
            .with_header("content-type", "text/html; charset=windows-1251")
            .with_body(body.into_owned())
            .create_async()
            .await;
        let fetcher = direct_fetcher(Duration::from_secs(5));

        // Act
        let page = fetcher
            .fetch(&format!("{}/forum", server.url()))
            .await
            .expect("fetch succeeds");

        // Assert
        assert_eq!(page.body, "<p>Свежая утечка базы</p>");
    }

    #[tokio::test]
    async fn should_pass_through_error_status() {
        // Arrange
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;
        let fetcher = direct_fetcher(Duration::from_secs(5));

        // Act
        let page = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .expect("non-200 is not a transport error");

        // Assert
        assert_eq!(page.status, 404);
    }

    #[tokio::test]
    async fn should_classify_unanswered_request_as_timeout() {
        // Arrange - accept connections but never respond
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let _holder = tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });
        let fetcher = direct_fetcher(Duration::from_millis(200));

        // Act
        let result = fetcher.fetch(&format!("http://{}/", addr)).await;

        // Assert
        assert_eq!(result, Err(FetchError::Timeout));
    }

    #[tokio::test]
    async fn should_classify_refused_connection() {
        // Arrange - reserve a port, then free it
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        let fetcher = direct_fetcher(Duration::from_secs(5));

        // Act
        let result = fetcher.fetch(&format!("http://{}/", addr)).await;

        // Assert
        assert!(matches!(result, Err(FetchError::Connection(_))));
    }

    #[tokio::test]
    async fn should_classify_unreachable_proxy_as_connection_error() {
        // Arrange - proxy port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        let proxy = format!("socks5h://{}", addr);
        let client = build_client(Some(&proxy), Duration::from_secs(5), "Mozilla/5.0")
            .expect("client builds");
        let fetcher = ProxyFetcher::new(client);

        // Act
        let result = fetcher.fetch("http://example2.onion/").await;

        // Assert
        assert!(matches!(result, Err(FetchError::Connection(_))));
    }

    #[tokio::test]
    async fn should_classify_invalid_url_as_other_error() {
        // Arrange
        let fetcher = direct_fetcher(Duration::from_secs(5));

        // Act
        let result = fetcher.fetch("not a url").await;

        // Assert
        assert!(matches!(result, Err(FetchError::Other(_))));
    }

    #[test]
    fn should_reject_malformed_proxy_url() {
        // Act
        let result = build_client(Some("http://[::1"), Duration::from_secs(1), "ua");

        // Assert
        assert!(matches!(result, Err(AppError::Http(_))));
    }
}
