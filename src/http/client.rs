use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::debug;

use super::request::HttpRequest;
use super::response::HttpResponse;

/// Sends one request and waits for the full response. Implementations make
/// a single attempt; failures are reported as a message.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

pub fn build_headers(input: &[(String, String)]) -> Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();

    for (key, value) in input {
        if key.is_empty() {
            continue;
        }

        let header_name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|err| format!("Invalid header name `{key}`: {err}"))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| format!("Invalid header value for `{key}`: {err}"))?;
        headers.append(header_name, header_value);
    }

    Ok(headers)
}

/// [`Transport`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout_ms: Option<u64>) -> Result<Self, String> {
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ms) = timeout_ms {
            if ms > 0 {
                builder = builder.timeout(Duration::from_millis(ms));
            }
        }

        let client = builder
            .build()
            .map_err(|err| format!("Failed to build HTTP client: {err}"))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let headers = build_headers(&request.headers)?;

        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .headers(headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|err| format!("Request failed: {err}"))?;

        let status = response.status().as_u16();
        let mut response_headers = BTreeMap::new();
        for (key, value) in response.headers() {
            response_headers
                .entry(key.to_string())
                .or_insert_with(|| value.to_str().unwrap_or_default().to_string());
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| format!("Failed to read response: {err}"))?;
        let elapsed = start.elapsed();
        debug!(status, bytes = body.len(), ?elapsed, "response received");

        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_headers_keeps_repeated_names() {
        let input = vec![
            ("Accept".to_string(), "text/xml".to_string()),
            ("accept".to_string(), "application/json".to_string()),
            (String::new(), "skipped".to_string()),
        ];
        let headers = build_headers(&input).unwrap();
        assert_eq!(headers.get_all("accept").iter().count(), 2);
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn build_headers_rejects_invalid_name() {
        let input = vec![("bad header".to_string(), "x".to_string())];
        let err = build_headers(&input).unwrap_err();
        assert!(err.contains("Invalid header name"));
    }
}
