use base64::Engine as _;
use restcheck_core::{Auth, TestCase};
use url::Url;

use crate::http::HttpRequestParts;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid url `{url}`: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },
    #[error("empty method")]
    EmptyMethod,
}

/// Assemble the wire request for a test case: URL plus query params, authored
/// headers, auth header, and a JSON content type for bodied requests that do
/// not set their own.
pub fn build_request(case: &TestCase) -> Result<HttpRequestParts, BuildError> {
    let method = case.method.trim();
    if method.is_empty() {
        return Err(BuildError::EmptyMethod);
    }

    let mut url = Url::parse(&case.url).map_err(|source| BuildError::Url {
        url: case.url.clone(),
        source,
    })?;
    if !case.params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in &case.params {
            pairs.append_pair(k, v);
        }
    }

    let mut headers = case.headers.clone();
    match &case.auth {
        Auth::None => {}
        Auth::Basic { username, password } => {
            let credentials =
                base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
            headers.insert("Authorization".to_string(), format!("Basic {credentials}"));
        }
        Auth::Bearer { token } => {
            headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        }
    }

    let body = case.body.clone().unwrap_or_default().into_bytes();
    if !body.is_empty() && !has_header(&headers, "content-type") {
        headers.insert(
            "Content-Type".to_string(),
            "application/json".to_string(),
        );
    }

    Ok(HttpRequestParts {
        method: method.to_ascii_uppercase(),
        url,
        headers,
        body,
    })
}

fn has_header(headers: &std::collections::BTreeMap<String, String>, name: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}
