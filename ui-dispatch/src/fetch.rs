//! Typed JSON fetch client
//!
//! [`FetchClient::fetch`] issues a request, rejects any status outside
//! 200-299 with [`FetchError::Http`], and decodes the body as JSON into the
//! requested type. An optional delay can be injected before the request is
//! issued to simulate latency.
//!
//! Nothing is retried, cached, or cancelled: every failure goes straight
//! back to the caller.
//!
//! # Example
//!
//! ```ignore
//! use ui_dispatch::fetch::{FetchClient, FetchOptions};
//! use ui_dispatch::types::MenuNode;
//!
//! let client = FetchClient::new();
//! let menu: Vec<MenuNode> = client.fetch("https://example.com/menu.json", None).await?;
//!
//! // Same request, 500ms later
//! let menu: Vec<MenuNode> = FetchClient::simulated()
//!     .fetch("https://example.com/menu.json", None)
//!     .await?;
//! ```

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

/// Delay applied by [`FetchClient::simulated`]
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(500);

/// Fetch failure
#[derive(Debug)]
pub enum FetchError {
    /// Transport-level failure: DNS, connection, body read, or a request
    /// that could not be built (bad URL or header)
    Network(reqwest::Error),
    /// A response arrived with a status outside 200-299
    Http { status: StatusCode },
    /// The body was not valid JSON for the requested type
    Decode(serde_json::Error),
}

impl FetchError {
    /// The HTTP status, for [`FetchError::Http`]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "Request failed: {}", e),
            FetchError::Http { status } => write!(f, "HTTP error! status: {}", status.as_u16()),
            FetchError::Decode(e) => write!(f, "Invalid JSON response: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Network(e) => Some(e),
            FetchError::Http { .. } => None,
            FetchError::Decode(e) => Some(e),
        }
    }
}

/// Request body
#[derive(Clone, Debug, PartialEq)]
pub enum FetchBody {
    Text(String),
    Bytes(Vec<u8>),
    /// Serialized as JSON with `Content-Type: application/json`
    Json(serde_json::Value),
}

/// Per-request configuration
#[derive(Clone, Debug, Default)]
pub struct FetchOptions {
    /// Defaults to GET
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<FetchBody>,
    /// Overrides the client's delay for this request
    pub delay: Option<Duration>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: FetchBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn json(self, value: serde_json::Value) -> Self {
        self.body(FetchBody::Json(value))
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// JSON fetch client with optional artificial latency
#[derive(Clone, Debug, Default)]
pub struct FetchClient {
    http: reqwest::Client,
    delay: Duration,
}

impl FetchClient {
    /// Client that issues requests immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Client that waits [`SIMULATED_LATENCY`] before each request
    pub fn simulated() -> Self {
        Self::new().with_delay(SIMULATED_LATENCY)
    }

    /// Wrap an existing `reqwest::Client` (connection pool, proxies, TLS setup)
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            http,
            delay: Duration::ZERO,
        }
    }

    /// Set the delay applied before every request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fetch `url` and decode the JSON body as `T`
    ///
    /// # Errors
    /// - [`FetchError::Network`] if the request can't be built or sent, or
    ///   the body can't be read
    /// - [`FetchError::Http`] if the status is outside 200-299
    /// - [`FetchError::Decode`] if the body isn't valid JSON for `T`
    pub async fn fetch<T>(&self, url: &str, options: Option<FetchOptions>) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let options = options.unwrap_or_default();

        let delay = options.delay.unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut request = self.http.request(options.method.clone(), url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request = match options.body {
            Some(FetchBody::Text(text)) => request.body(text),
            Some(FetchBody::Bytes(bytes)) => request.body(bytes),
            Some(FetchBody::Json(value)) => request.json(&value),
            None => request,
        };

        tracing::debug!(method = %options.method, url, "Issuing request");
        let response = request.send().await.map_err(FetchError::Network)?;

        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "Response received");
        if !status.is_success() {
            return Err(FetchError::Http { status });
        }

        let bytes = response.bytes().await.map_err(FetchError::Network)?;
        serde_json::from_slice(&bytes).map_err(FetchError::Decode)
    }
}

/// Fetch with a default client; `options.delay` still applies
pub async fn fetch<T>(url: &str, options: Option<FetchOptions>) -> Result<T, FetchError>
where
    T: DeserializeOwned,
{
    FetchClient::new().fetch(url, options).await
}
