use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

/// Per-request execution limits.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub timeout: Duration,
    pub max_response_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_response_bytes: 4 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequestParts {
    pub method: String,
    pub url: url::Url,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct HttpResponseParts {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponseParts {
    /// Body as text, lossily decoded; this is what gets handed to the
    /// response verifier.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,
    #[error("could not reach {url}: {detail}")]
    Unreachable { url: String, detail: String },
    #[error("response body exceeds the {max_bytes} byte cap")]
    BodyTooLarge { max_bytes: usize },
    #[error("invalid method `{0}`")]
    Method(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, req: HttpRequestParts, limits: Limits)
        -> Result<HttpResponseParts, HttpError>;
}

pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        // Builder failure here would mean a broken TLS backend; surfacing it
        // lazily gives a worse message than failing loudly up front.
        let client = reqwest::Client::builder()
            .user_agent(concat!("restcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| panic!("failed to create reqwest HTTP client: {e}"));
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(
        &self,
        req: HttpRequestParts,
        limits: Limits,
    ) -> Result<HttpResponseParts, HttpError> {
        let method: reqwest::Method = req
            .method
            .parse()
            .map_err(|_| HttpError::Method(req.method.clone()))?;

        let mut rb = self
            .client
            .request(method, req.url)
            .timeout(limits.timeout)
            .body(req.body);
        for (k, v) in req.headers {
            rb = rb.header(k, v);
        }

        let resp = rb.send().await.map_err(map_send_error)?;
        let status = resp.status().as_u16();

        let mut headers = BTreeMap::new();
        for (k, v) in resp.headers() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }

        // Reject oversized bodies before buffering when the server declares a
        // length, and again after reading for chunked responses.
        if declared_length_exceeds_cap(resp.content_length(), limits.max_response_bytes) {
            return Err(HttpError::BodyTooLarge {
                max_bytes: limits.max_response_bytes,
            });
        }
        let body = resp.bytes().await.map_err(map_send_error)?;
        if body.len() > limits.max_response_bytes {
            return Err(HttpError::BodyTooLarge {
                max_bytes: limits.max_response_bytes,
            });
        }

        Ok(HttpResponseParts {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

// Compared in u64 so a declared length above usize::MAX cannot wrap the cap
// on 32-bit targets.
fn declared_length_exceeds_cap(declared: Option<u64>, max_bytes: usize) -> bool {
    declared.is_some_and(|len| len > max_bytes as u64)
}

fn map_send_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        return HttpError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        return HttpError::Unreachable {
            url,
            detail: e.to_string(),
        };
    }
    HttpError::Transport(e.to_string())
}
