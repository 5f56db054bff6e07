//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ProviderError;

/// Default timeout for coverage requests in seconds.
///
/// The upstream coverage service usually answers well inside this bound;
/// anything slower is treated as a failed fetch rather than left hanging.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A raw HTTP response: status code plus body bytes.
///
/// The status is carried alongside the body (rather than mapped to an error
/// inside the client) because the coverage provider must surface non-success
/// statuses together with the upstream response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the response carries a success status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body decoded as text, with invalid UTF-8 replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
#[allow(async_fn_in_trait)]
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// Returns the response status and body, or an error if the request
    /// could not be issued at all (network failure, timeout).
    async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new ReqwestClient with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::HttpError(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ProviderError::HttpError(format!("Failed to read response: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock HTTP client for testing.
    ///
    /// Records every requested URL and replays a programmed response.
    pub struct MockHttpClient {
        pub response: Result<HttpResponse, ProviderError>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn with_response(response: Result<HttpResponse, ProviderError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn ok(status: u16, body: &[u8]) -> Self {
            Self::with_response(Ok(HttpResponse {
                status,
                body: body.to_vec(),
            }))
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockHttpClient::ok(200, &[1, 2, 3, 4]);

        let result = mock.get("http://example.com").await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.body, vec![1, 2, 3, 4]);
        assert_eq!(mock.requested_urls(), vec!["http://example.com"]);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockHttpClient::with_response(Err(ProviderError::HttpError(
            "Test error".to_string(),
        )));

        let result = mock.get("http://example.com").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_is_success_boundaries() {
        let ok = HttpResponse {
            status: 200,
            body: vec![],
        };
        let redirect = HttpResponse {
            status: 302,
            body: vec![],
        };
        let server_error = HttpResponse {
            status: 500,
            body: vec![],
        };

        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!server_error.is_success());
    }

    #[test]
    fn test_body_text_replaces_invalid_utf8() {
        let response = HttpResponse {
            status: 500,
            body: vec![0xff, 0xfe, b'o', b'k'],
        };
        assert!(response.body_text().ends_with("ok"));
    }
}
