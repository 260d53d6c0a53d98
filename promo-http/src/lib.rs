//! Minimal HTTP client with safe logging and custom-header auth.
//!
//! - Request options: `Auth` and query params; no client-side timeout
//! - Only `200 OK` counts as success; everything else is an [`HttpError::Api`]
//! - No retries: the first failure is handed straight back to the caller
//! - Never logs secret values, only the auth kind
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), promo_http::HttpError> {
//! let client = promo_http::HttpClient::new("https://api.example.com/v1")?;
//! let got: serde_json::Value = client
//!     .get_json("items", promo_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), and final errors.

use promo_common::PromoError;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

const SNIPPET_MAX: usize = 500;

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned status `{}`: {message}", .status.as_u16())]
    Api { status: StatusCode, message: String },
}

impl From<HttpError> for PromoError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Api { status, .. } => PromoError::Transport {
                status: Some(status.as_u16()),
                message: err.to_string(),
            },
            HttpError::Decode(..) => PromoError::Decode(err.to_string()),
            HttpError::Url(_) | HttpError::Build(_) | HttpError::Network(_) => {
                PromoError::Transport {
                    status: None,
                    message: err.to_string(),
                }
            }
        }
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use promo_http::Auth;
/// use reqwest::header::{HeaderName, HeaderValue};
///
/// let auth = Auth::Header {
///     name: HeaderName::from_static("x-auth-token"),
///     value: HeaderValue::from_static("secret"),
/// };
/// assert_eq!(auth.kind(), "header");
/// ```
#[derive(Clone, Debug)]
pub enum Auth {
    /// Custom header (e.g., vc.ru: X-Auth-Token)
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
}

impl Auth {
    /// Build a header auth, validating both the header name and the secret
    /// up front.
    pub fn header(name: &str, secret: &str) -> Result<Self, HttpError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HttpError::Build(format!("invalid header name {name:?}: {e}")))?;
        let mut value = HeaderValue::from_str(secret)
            .map_err(|e| HttpError::Build(format!("invalid {name} header: {e}")))?;
        value.set_sensitive(true);
        Ok(Self::Header {
            name: header_name,
            value,
        })
    }

    /// Label used in logs in place of the secret.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Header { .. } => "header",
        }
    }
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use promo_http::RequestOpts;
///
/// let opts = RequestOpts {
///     query: Some(vec![("sorting", "date".into())]),
///     ..Default::default()
/// };
///
/// assert!(opts.auth.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub auth: Option<Auth>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("hashtag", "tag".into())]
}

enum Body<'a, F: ?Sized> {
    Empty,
    Form(&'a F),
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// The base is treated as a directory, so a path prefix such as `/v2.31`
    /// survives when endpoints are joined onto it.
    ///
    /// ```
    /// use promo_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://api.example.com/v2")?;
    /// assert_eq!(client.base().as_str(), "https://api.example.com/v2/");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let mut base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(HttpError::Url(format!("not a base URL: {base}")));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self { base, inner })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint relative to the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// GET JSON with per-request options (query/auth).
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let (req_id, bytes) = self
            .execute::<()>(Method::GET, path, Body::Empty, opts)
            .await?;
        let snippet = snip_body(&bytes);

        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            tracing::warn!(
                req_id=%req_id,
                serde_line=%e.line(),
                serde_col=%e.column(),
                serde_err=%e.to_string(),
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// POST an `application/x-www-form-urlencoded` body. The response body is
    /// discarded once the status has been checked.
    pub async fn post_form<F>(
        &self,
        path: &str,
        form: &F,
        opts: RequestOpts<'_>,
    ) -> Result<(), HttpError>
    where
        F: Serialize + ?Sized,
    {
        self.execute(Method::POST, path, Body::Form(form), opts)
            .await
            .map(|_| ())
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        body: Body<'_, F>,
        opts: RequestOpts<'_>,
    ) -> Result<(String, Vec<u8>), HttpError>
    where
        F: Serialize + ?Sized,
    {
        let url = self.resolve(path)?;

        // ----- Build request -----
        let mut rb = self.inner.request(method.clone(), url.clone());

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }

        let has_body = match body {
            Body::Empty => false,
            Body::Form(form) => {
                // Sets Content-Type: application/x-www-form-urlencoded
                rb = rb.form(form);
                true
            }
        };

        if let Some(Auth::Header { name, value }) = &opts.auth {
            rb = rb.header(name, value);
        }

        // ----- Safe request logging (pre-send) -----
        let auth_kind = opts.auth.as_ref().map_or("none", Auth::kind);
        let redacted_q = redact_query(opts.query.as_deref().unwrap_or_default());

        // Lightweight request id without extra deps
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?redacted_q,
            auth_kind,
            has_body,
            "http.request.start"
        );

        // ----- Send -----
        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=t0.elapsed().as_millis() as u64,
            "http.response.headers"
        );

        // ----- Success path -----
        if status == StatusCode::OK {
            let bytes = resp.bytes().await.map_err(|err| {
                let message = err.to_string();
                tracing::warn!(req_id=%req_id, message=%message, "http.network_error.body");
                HttpError::Network(message)
            })?;
            tracing::trace!(
                req_id=%req_id,
                body_len=bytes.len(),
                body_snippet=%snip_body(&bytes),
                "http.response.body_snippet"
            );
            return Ok((req_id, bytes.to_vec()));
        }

        // ----- Final error -----
        // The status decides the outcome; the body only feeds the message.
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                tracing::debug!(req_id=%req_id, error=%err, "http.error.body_unreadable");
                Vec::new()
            }
        };
        let snippet = snip_body(&bytes);
        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api { status, message })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // Generic: {"message":"..."} or {"error":"..."} or {"detail":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: Option<serde_json::Value>,
        #[serde(default)]
        error: Option<serde_json::Value>,
        #[serde(default)]
        detail: Option<serde_json::Value>,
    }

    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        for candidate in [m.message, m.error, m.detail].into_iter().flatten() {
            match candidate {
                serde_json::Value::String(s) if !s.is_empty() => return s,
                serde_json::Value::Object(obj) => {
                    if let Some(serde_json::Value::String(s)) = obj.get("message") {
                        if !s.is_empty() {
                            return s.clone();
                        }
                    }
                }
                _ => {}
            }
        }
    }
    snip_body(body)
}

fn is_secret_param(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "access_token" | "authorization" | "auth" | "key" | "api_key" | "token" | "secret"
    )
}

fn redact_query(query: &[(&str, Cow<'_, str>)]) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| {
            let value = if is_secret_param(k) {
                "<redacted>".to_string()
            } else {
                v.as_ref().to_string()
            };
            ((*k).to_string(), value)
        })
        .collect()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
