// File: src/fetch.rs
// Purpose: Data fetch collaborator seam, wire conventions, and payload extraction

use anyhow::{Context, Result};
use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Marker headers recognized on route data responses.
pub mod marker {
    /// Redirect target emitted by a route handler.
    pub const REDIRECT: &str = "x-trellis-redirect";

    /// Presence alone asks the client to revalidate after the redirect.
    pub const REVALIDATE: &str = "x-trellis-revalidate";

    /// Marks a deliberate boundary ("catch") response.
    pub const CATCH: &str = "x-trellis-catch";

    /// Marks a serialized server-side fault. Fetcher implementations turn
    /// these into fault values before the engine sees them.
    pub const ERROR: &str = "x-trellis-error";
}

/// Payload accompanying a data-mutating navigation.
#[derive(Debug, Clone)]
pub struct Submission {
    /// HTTP method of the submission (POST, PUT, DELETE, ...).
    pub method: Method,
    /// Action URL the submission targets.
    pub action: String,
    /// Serialized form payload.
    pub payload: JsonValue,
}

impl Submission {
    pub fn new(method: Method, action: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            method,
            action: action.into(),
            payload,
        }
    }
}

/// HTTP response handed back by the fetch collaborator.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    /// Adds a header (builder style).
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        let value = HeaderValue::from_str(value).expect("invalid header value");
        self.headers.insert(HeaderName::from_static(name), value);
        self
    }

    /// Sets the body (builder style).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Canonical reason phrase for the status code.
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Whether the response declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .map(|content_type| content_type.contains("json"))
            .unwrap_or(false)
    }

    /// Extracts the route data payload: parsed JSON when the content
    /// type declares it, the raw text otherwise.
    pub fn extract_payload(&self) -> Result<JsonValue> {
        if self.is_json() {
            serde_json::from_str(&self.body).context("malformed JSON in route data response")
        } else {
            Ok(JsonValue::String(self.body.clone()))
        }
    }
}

/// Recognizes a deliberate boundary response.
pub fn is_catch_response(response: &FetchResponse) -> bool {
    response.headers.contains_key(marker::CATCH)
}

/// Recognizes a serialized server fault. The engine never sees these:
/// fetcher implementations deserialize them into fault values first.
pub fn is_error_response(response: &FetchResponse) -> bool {
    response.headers.contains_key(marker::ERROR)
}

/// External data fetch collaborator.
///
/// The `Err` side is the fault value of the error model: the engine
/// surfaces it unchanged as a structural failure. The cancellation token
/// belongs to one navigation or submission attempt; whether it is
/// honored mid-flight is this collaborator's contract.
#[async_trait]
pub trait DataFetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &Url,
        route_id: &str,
        token: CancellationToken,
        submission: Option<&Submission>,
    ) -> Result<FetchResponse>;
}
