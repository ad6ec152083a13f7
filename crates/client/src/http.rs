use crate::retry::{RawResponse, RetryStrategy, run_with_retry};
use model::error::ApiError;
use reqwest::Url;
use std::time::Instant;
use tracing::trace;

const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

enum Payload {
    None,
    Json(serde_json::Value),
    OctetStream(Vec<u8>),
}

/// Thin wrapper over one shared `reqwest::Client`.
///
/// Constructed once at startup and passed by reference everywhere a
/// transport is needed; the connection pool lives inside the reqwest
/// client, so cloning this handle is cheap and keeps a single pool.
#[derive(Clone, Default)]
pub struct HttpClient {
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        HttpClient { http }
    }

    pub async fn get(&self, url: &str, strategy: &dyn RetryStrategy) -> Result<String, ApiError> {
        self.execute(url, Payload::None, strategy).await
    }

    pub async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
        strategy: &dyn RetryStrategy,
    ) -> Result<String, ApiError> {
        self.execute(url, Payload::Json(body), strategy).await
    }

    pub async fn post_bytes(
        &self,
        url: &str,
        bytes: Vec<u8>,
        strategy: &dyn RetryStrategy,
    ) -> Result<String, ApiError> {
        self.execute(url, Payload::OctetStream(bytes), strategy)
            .await
    }

    async fn execute(
        &self,
        url: &str,
        payload: Payload,
        strategy: &dyn RetryStrategy,
    ) -> Result<String, ApiError> {
        run_with_retry(|| self.attempt(url, &payload), strategy).await
    }

    async fn attempt(&self, url: &str, payload: &Payload) -> Result<RawResponse, ApiError> {
        let started = Instant::now();
        let request = match payload {
            Payload::None => self.http.get(url),
            Payload::Json(body) => self.http.post(url).json(body),
            Payload::OctetStream(bytes) => self
                .http
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(bytes.clone()),
        };
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        trace!(url, status, elapsed = ?started.elapsed(), "request completed");
        Ok(RawResponse { status, body })
    }
}

/// Appends non-empty query parameters to a base URL.
pub fn build_url(base: &str, params: &[(&str, Option<String>)]) -> Result<String, ApiError> {
    let mut url =
        Url::parse(base).map_err(|err| ApiError::Logical(format!("invalid url {base}: {err}")))?;
    {
        let mut query = url.query_pairs_mut();
        for (name, value) in params {
            if let Some(value) = value
                && !value.is_empty()
            {
                query.append_pair(name, value);
            }
        }
    }
    let rendered = url.to_string();
    Ok(rendered.trim_end_matches('?').to_string())
}

/// Rewrites `ipfs://` URIs to a public HTTP gateway; anything else passes
/// through unchanged.
pub fn http_url_from(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("ipfs://ipfs/") {
        return format!("{IPFS_GATEWAY}{rest}");
    }
    if let Some(rest) = url.strip_prefix("ipfs://") {
        return format!("{IPFS_GATEWAY}{rest}");
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_urls_with_filtered_params() {
        let url = build_url(
            "https://api.example.org/extended/v1/tokens/nft/holdings",
            &[
                ("principal", Some("SP000".to_string())),
                ("asset_identifiers", None),
                ("limit", Some("50".to_string())),
                ("offset", Some("0".to_string())),
                ("empty", Some(String::new())),
            ],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://api.example.org/extended/v1/tokens/nft/holdings?principal=SP000&limit=50&offset=0"
        );
    }

    #[test]
    fn encodes_reserved_characters() {
        let url = build_url(
            "https://api.example.org/search",
            &[("q", Some("a b&c".to_string()))],
        )
        .unwrap();
        assert_eq!(url, "https://api.example.org/search?q=a+b%26c");
    }

    #[test]
    fn rewrites_ipfs_uris() {
        assert_eq!(
            http_url_from("ipfs://QmHash/1.json"),
            "https://ipfs.io/ipfs/QmHash/1.json"
        );
        assert_eq!(
            http_url_from("ipfs://ipfs/QmHash"),
            "https://ipfs.io/ipfs/QmHash"
        );
        assert_eq!(
            http_url_from("https://plain.example/x.json"),
            "https://plain.example/x.json"
        );
    }
}
