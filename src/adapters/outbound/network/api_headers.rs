use crate::shared::Result;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

/// Header naming the integration that issued a request
pub const ORIGIN_HEADER: &str = "cxorigin";

/// Default timeout for every outbound call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn user_agent() -> String {
    format!("artifact-gate/{}", env!("CARGO_PKG_VERSION"))
}

pub fn origin() -> String {
    format!("ArtifactGate {}", env!("CARGO_PKG_VERSION"))
}

/// Builds an HTTP client carrying the user agent and origin header on every request.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ORIGIN_HEADER, HeaderValue::from_str(&origin())?);

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent())
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Appends a trailing `/` so relative endpoint paths can be concatenated.
pub fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
