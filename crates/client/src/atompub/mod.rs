//! Hatena Blog AtomPub client.
//!
//! Implements `EntrySource` over the blog's AtomPub endpoints.
//!
//! ### Endpoints
//!
//! - **Collection**: `{base}/{hatena_id}/{blog_id}/atom/entry`, paginated via `link rel="next"`.
//! - **Member**: `{collection}/{entry_id}`.
//! - **Authentication**: HTTP Basic with `hatena_id:api_key`.
//!
//! Page cursors are the `next` hrefs themselves. A cursor is only followed if
//! it points inside this blog's collection, so credentials never leave the host.

pub mod error;
pub mod parse;

pub use error::AtomPubError;
pub use parse::{parse_entry, parse_feed};

use std::time::{Duration, Instant};

use hatena_core::{AppConfig, ConfigError, Entry, EntryPage, EntrySource, Error};
use reqwest::{StatusCode, header};
use url::Url;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "mcp-hatena-blog/0.1";

/// AtomPub client configuration.
#[derive(Debug, Clone)]
pub struct HatenaConfig {
    pub hatena_id: String,
    pub blog_id: String,
    pub api_key: String,
    /// Base URL (default: https://blog.hatena.ne.jp).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: mcp-hatena-blog/0.x).
    pub user_agent: String,
}

impl Default for HatenaConfig {
    fn default() -> Self {
        Self {
            hatena_id: String::new(),
            blog_id: String::new(),
            api_key: String::new(),
            base_url: hatena_core::config::DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HatenaConfig {
    /// Build a client configuration from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let creds = config.require_credentials()?;
        Ok(Self {
            hatena_id: creds.hatena_id.to_string(),
            blog_id: creds.blog_id.to_string(),
            api_key: creds.api_key.to_string(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Hatena Blog AtomPub client.
#[derive(Debug, Clone)]
pub struct HatenaClient {
    http: reqwest::Client,
    config: HatenaConfig,
    collection: Url,
}

impl HatenaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HatenaConfig) -> Result<Self, AtomPubError> {
        for (field, value) in [("hatena_id", &config.hatena_id), ("blog_id", &config.blog_id), ("api_key", &config.api_key)]
        {
            if value.trim().is_empty() {
                return Err(AtomPubError::MissingCredentials(field.to_string()));
            }
        }

        let collection = Url::parse(&format!(
            "{}/{}/{}/atom/entry",
            config.base_url.trim_end_matches('/'),
            config.hatena_id,
            config.blog_id
        ))
        .map_err(|e| AtomPubError::InvalidCursor(format!("bad base URL {}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(AtomPubError::from)?;

        Ok(Self { http, config, collection })
    }

    /// Collection URI of the blog's entries.
    pub fn collection_uri(&self) -> &Url {
        &self.collection
    }

    /// Member URI of a single entry.
    pub fn member_uri(&self, entry_id: &str) -> Result<Url, AtomPubError> {
        let valid = !entry_id.is_empty() && entry_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AtomPubError::InvalidEntryId(entry_id.to_string()));
        }

        Url::parse(&format!("{}/{}", self.collection, entry_id)).map_err(|e| AtomPubError::InvalidEntryId(e.to_string()))
    }

    /// Resolve a page cursor, rejecting anything outside the collection.
    pub fn page_uri(&self, cursor: Option<&str>) -> Result<Url, AtomPubError> {
        let Some(cursor) = cursor.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(self.collection.clone());
        };

        let url = Url::parse(cursor).map_err(|_| AtomPubError::InvalidCursor(cursor.to_string()))?;

        let same_origin = url.scheme() == self.collection.scheme()
            && url.host_str() == self.collection.host_str()
            && url.port_or_known_default() == self.collection.port_or_known_default();

        if !same_origin || url.path() != self.collection.path() {
            return Err(AtomPubError::InvalidCursor(cursor.to_string()));
        }

        Ok(url)
    }

    async fn get_xml(&self, url: &Url) -> Result<String, AtomPubError> {
        let start = Instant::now();
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.as_str())
            .basic_auth(&self.config.hatena_id, Some(&self.config.api_key))
            .header(header::ACCEPT, "application/atom+xml")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("AtomPub response status: {} in {:?}", status, start.elapsed());

        if let Some(err) = status_error(status, url) {
            return Err(err);
        }

        Ok(response.text().await?)
    }
}

/// Error for a non-success response, or None when the body should be read.
fn status_error(status: StatusCode, url: &Url) -> Option<AtomPubError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(AtomPubError::AuthError),
        StatusCode::NOT_FOUND => Some(AtomPubError::NotFound(url.to_string())),
        s if s.is_client_error() || s.is_server_error() => Some(AtomPubError::HttpError { status: s.as_u16() }),
        _ => None,
    }
}

#[async_trait::async_trait]
impl EntrySource for HatenaClient {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<EntryPage, Error> {
        let url = self.page_uri(cursor)?;
        // A missing collection or page means a wrong blog id or a dead cursor, not a missing entry.
        let xml = match self.get_xml(&url).await {
            Err(AtomPubError::NotFound(_)) => {
                tracing::warn!(url = %url, "collection page not found");
                return Err(AtomPubError::HttpError { status: StatusCode::NOT_FOUND.as_u16() }.into());
            }
            other => other?,
        };
        let page = parse_feed(&xml)?;

        tracing::debug!(entries = page.entries.len(), has_next = page.next_cursor.is_some(), "fetched page");
        Ok(page)
    }

    async fn fetch_entry(&self, entry_id: &str) -> Result<Entry, Error> {
        let url = self.member_uri(entry_id)?;
        let xml = match self.get_xml(&url).await {
            Err(AtomPubError::NotFound(_)) => return Err(AtomPubError::NotFound(entry_id.to_string()).into()),
            other => other?,
        };

        Ok(parse_entry(&xml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HatenaClient {
        HatenaClient::new(HatenaConfig {
            hatena_id: "alice".into(),
            blog_id: "alice.hatenablog.com".into(),
            api_key: "secret".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_client_new_missing_credentials() {
        let result = HatenaClient::new(HatenaConfig { hatena_id: "alice".into(), ..Default::default() });
        assert!(matches!(result, Err(AtomPubError::MissingCredentials(field)) if field == "blog_id"));
    }

    #[test]
    fn test_collection_and_member_uri() {
        let client = client();
        assert_eq!(
            client.collection_uri().as_str(),
            "https://blog.hatena.ne.jp/alice/alice.hatenablog.com/atom/entry"
        );
        assert_eq!(
            client.member_uri("26006613407001432").unwrap().as_str(),
            "https://blog.hatena.ne.jp/alice/alice.hatenablog.com/atom/entry/26006613407001432"
        );
    }

    #[test]
    fn test_member_uri_rejects_path_tricks() {
        let client = client();
        assert!(matches!(client.member_uri("../../other"), Err(AtomPubError::InvalidEntryId(_))));
        assert!(matches!(client.member_uri(""), Err(AtomPubError::InvalidEntryId(_))));
    }

    #[test]
    fn test_page_uri_defaults_to_collection() {
        let client = client();
        assert_eq!(client.page_uri(None).unwrap(), *client.collection_uri());
        assert_eq!(client.page_uri(Some("  ")).unwrap(), *client.collection_uri());
    }

    #[test]
    fn test_page_uri_accepts_next_link() {
        let client = client();
        let next = "https://blog.hatena.ne.jp/alice/alice.hatenablog.com/atom/entry?page=1377575606";
        assert_eq!(client.page_uri(Some(next)).unwrap().as_str(), next);
    }

    #[test]
    fn test_page_uri_rejects_foreign_cursor() {
        let client = client();
        for cursor in [
            "https://evil.example/alice/alice.hatenablog.com/atom/entry?page=1",
            "http://blog.hatena.ne.jp/alice/alice.hatenablog.com/atom/entry?page=1",
            "https://blog.hatena.ne.jp/bob/bob.hatenablog.com/atom/entry?page=1",
            "not a url",
        ] {
            assert!(matches!(client.page_uri(Some(cursor)), Err(AtomPubError::InvalidCursor(_))), "{cursor}");
        }
    }

    #[test]
    fn test_from_app_config() {
        let app = AppConfig {
            hatena_id: Some("alice".into()),
            blog_id: Some("alice.hatenablog.com".into()),
            api_key: Some("secret".into()),
            timeout_ms: 5_000,
            ..Default::default()
        };
        let config = HatenaConfig::from_app_config(&app).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.base_url, "https://blog.hatena.ne.jp");

        assert!(HatenaConfig::from_app_config(&AppConfig::default()).is_err());
    }

    #[test]
    fn test_status_error_mapping() {
        let url = Url::parse("https://blog.hatena.ne.jp/alice/alice.hatenablog.com/atom/entry/1").unwrap();

        assert!(status_error(StatusCode::OK, &url).is_none());
        assert!(status_error(StatusCode::CREATED, &url).is_none());
        assert!(matches!(status_error(StatusCode::UNAUTHORIZED, &url), Some(AtomPubError::AuthError)));
        assert!(matches!(status_error(StatusCode::FORBIDDEN, &url), Some(AtomPubError::AuthError)));
        assert!(matches!(status_error(StatusCode::NOT_FOUND, &url), Some(AtomPubError::NotFound(u)) if u == url.as_str()));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, &url),
            Some(AtomPubError::HttpError { status: 429 })
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, &url),
            Some(AtomPubError::HttpError { status: 500 })
        ));
    }

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/atom+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn local_client(base_url: String) -> HatenaClient {
        HatenaClient::new(HatenaConfig {
            hatena_id: "alice".into(),
            blog_id: "alice.hatenablog.com".into(),
            api_key: "secret".into(),
            base_url,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_entry_404_is_not_found() {
        let client = local_client(serve_once("404 Not Found", "").await);
        let result = client.fetch_entry("123").await;
        assert!(matches!(result, Err(Error::NotFound(msg)) if msg.contains("123")));
    }

    #[tokio::test]
    async fn test_fetch_entry_500_is_upstream() {
        let client = local_client(serve_once("500 Internal Server Error", "").await);
        let result = client.fetch_entry("123").await;
        assert!(matches!(result, Err(Error::Upstream(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_fetch_page_404_is_upstream() {
        let client = local_client(serve_once("404 Not Found", "").await);
        let result = client.fetch_page(None).await;
        assert!(matches!(result, Err(Error::Upstream(msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_fetch_page_401_is_upstream_auth() {
        let client = local_client(serve_once("401 Unauthorized", "").await);
        let result = client.fetch_page(None).await;
        assert!(matches!(result, Err(Error::Upstream(msg)) if msg.contains("authentication")));
    }

    #[tokio::test]
    async fn test_fetch_page_non_atom_body_is_upstream() {
        let client = local_client(serve_once("200 OK", "<html><body>maintenance</body></html>").await);
        let result = client.fetch_page(None).await;
        assert!(matches!(result, Err(Error::Upstream(msg)) if msg.contains("parse")));
    }

    #[tokio::test]
    async fn test_fetch_entry_invalid_id_is_invalid_input() {
        let result = client().fetch_entry("a/b").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
