//! Core HTTP client for the mutual-fund admin REST API.
//!
//! The [`AdminClient`] struct is the main entry point for talking to the admin
//! service. It wraps [`reqwest::Client`] with the JSON default headers and
//! provides typed `get`, `post` and no-content helpers that return
//! [`Result`].
//!
//! The resource operations live in `impl` blocks in the [`crate::api`]
//! module. Unlike these helpers, they never surface transport errors: a
//! failure is logged and turned into an empty value.

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::AdminConfig;
use crate::constants::DEFAULT_API_BASE_URL;
use crate::error::{AdminError, ApiErrorBody, Result};

/// Core HTTP client for the admin REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use mf_admin::client::AdminClient;
///
/// # #[tokio::main]
/// # async fn main() -> mf_admin::error::Result<()> {
/// let client = AdminClient::with_base_url("http://localhost:8080")?;
/// let houses = client.get_fund_houses().await;
/// println!("{} fund houses", houses.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    /// Base URL for REST requests (defaults to [`DEFAULT_API_BASE_URL`]).
    base_url: Url,
}

impl AdminClient {
    /// Create a client pointing at [`DEFAULT_API_BASE_URL`].
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a client pointing at a custom base URL.
    ///
    /// The base may carry a path prefix (`http://host/api`); request paths are
    /// appended below it.
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        if base_url.cannot_be_a_base() {
            return Err(AdminError::InvalidArgument(format!(
                "base URL cannot carry paths: {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .default_headers(Self::default_headers())
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Create a client from an [`AdminConfig`].
    pub fn from_config(config: &AdminConfig) -> Result<Self> {
        Self::with_base_url(&config.api_base_url)
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build a request URL from path segments and query pairs.
    ///
    /// Each segment is percent-encoded on its own, so ids containing `/` or
    /// spaces stay a single path segment.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AdminError::InvalidArgument(format!("base URL cannot carry paths: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    // -----------------------------------------------------------------------
    // Generic HTTP helpers
    // -----------------------------------------------------------------------

    /// Perform a GET request and deserialize the JSON response.
    pub async fn get<R: DeserializeOwned>(&self, url: Url) -> Result<R> {
        tracing::debug!(%url, "GET");
        let resp = self.http.get(url).send().await?;
        let bytes = Self::success_bytes(resp).await?;
        serde_json::from_slice(&bytes).map_err(AdminError::Json)
    }

    /// Perform a GET request whose body may be empty or JSON `null`.
    pub async fn get_optional<R: DeserializeOwned>(&self, url: Url) -> Result<Option<R>> {
        tracing::debug!(%url, "GET (optional)");
        let resp = self.http.get(url).send().await?;
        let bytes = Self::success_bytes(resp).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes).map_err(AdminError::Json)
    }

    /// Perform a POST request with a JSON body and deserialize the response.
    pub async fn post<B: Serialize, R: DeserializeOwned>(&self, url: Url, body: &B) -> Result<R> {
        tracing::debug!(%url, "POST");
        let resp = self.http.post(url).json(body).send().await?;
        let bytes = Self::success_bytes(resp).await?;
        serde_json::from_slice(&bytes).map_err(AdminError::Json)
    }

    /// Perform a GET request and ignore whatever body comes back.
    pub async fn get_no_content(&self, url: Url) -> Result<()> {
        tracing::debug!(%url, "GET (no content)");
        let resp = self.http.get(url).send().await?;
        Self::success_bytes(resp).await.map(drop)
    }

    /// Perform a POST request with a JSON body and ignore the response body.
    pub async fn post_no_content<B: Serialize>(&self, url: Url, body: &B) -> Result<()> {
        tracing::debug!(%url, "POST (no content)");
        let resp = self.http.post(url).json(body).send().await?;
        Self::success_bytes(resp).await.map(drop)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Default headers applied to every request.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Read a response body, mapping non-2xx statuses to an [`AdminError`].
    async fn success_bytes(resp: reqwest::Response) -> Result<Bytes> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            Ok(bytes)
        } else {
            let body = String::from_utf8_lossy(&bytes);
            Err(parse_error_body(status, &body))
        }
    }
}

/// Try to parse the service's JSON error structure; fall back to a raw HTTP
/// status error.
pub(crate) fn parse_error_body(status: reqwest::StatusCode, body: &str) -> AdminError {
    if let Ok(api_err) = serde_json::from_str::<ApiErrorBody>(body) {
        if api_err.error.is_some() || api_err.message.is_some() {
            return AdminError::Api(api_err);
        }
    }
    AdminError::HttpStatus {
        status,
        body: body.to_owned(),
    }
}
