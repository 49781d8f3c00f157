use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use super::options::QueryOptions;
use super::types::{CertificateReport, CheckResponse};
use crate::cache::TtlCache;
use crate::error::{Result, SslCheckError};
use crate::retry::{ApiRetryClassifier, RetryExecutor, RetryPolicy};
use crate::validation::normalize_domain;

const DEFAULT_BASE_URL: &str = "https://api.apiverve.com/v1/sslcertificatechecker";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
const USER_AGENT: &str = concat!("sslcheck/", env!("CARGO_PKG_VERSION"));

/// Client for the SSL Certificate Checker API.
///
/// Performs the request described by a [`QueryOptions`] value: the
/// options are serialized into the query string (wire key `domain`)
/// and the result envelope is decoded into a [`CertificateReport`].
/// Transient failures are retried with exponential backoff and results
/// are cached per domain to conserve API quota.
#[derive(Clone)]
pub struct CheckClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    retry: RetryExecutor<ApiRetryClassifier>,
    cache: Arc<TtlCache<String, CertificateReport>>,
    use_cache: bool,
}

impl Default for CheckClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckClient {
    /// Create a new client with default settings and no API key.
    pub fn new() -> Self {
        Self {
            http: build_http_client(DEFAULT_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryExecutor::new(RetryPolicy::default()),
            cache: Arc::new(TtlCache::new(DEFAULT_CACHE_TTL)),
            use_cache: true,
        }
    }

    /// Set the API key sent in the `x-api-key` header.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API endpoint (useful for testing against a mock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.http = build_http_client(timeout);
        self
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = RetryExecutor::new(policy);
        self
    }

    /// Set the TTL for cached reports.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = Arc::new(TtlCache::new(ttl));
        self
    }

    /// Disable the result cache; every call hits the API.
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    /// Check the SSL certificate described by the given options.
    ///
    /// The options container itself never validates anything; a missing
    /// or malformed domain is rejected here, before a request is made.
    #[instrument(skip(self), fields(domain = ?options.domain))]
    pub async fn check(&self, options: &QueryOptions) -> Result<CertificateReport> {
        let domain = options.domain().ok_or(SslCheckError::MissingDomain)?;
        let domain = normalize_domain(domain)?;

        if self.use_cache {
            if let Some(report) = self.cache.get(&domain) {
                debug!(domain = %domain, "Serving certificate report from cache");
                return Ok(report);
            }
        }

        // Re-issue the options with the normalized domain so the wire
        // payload matches what was actually checked.
        let wire_options = QueryOptions::new().with_domain(domain.clone());
        let report = self.retry.execute(|| self.fetch(&wire_options)).await?;

        if self.use_cache {
            self.cache.insert(domain, report.clone());
        }

        Ok(report)
    }

    /// Convenience wrapper: check a single domain.
    pub async fn check_domain(&self, domain: &str) -> Result<CertificateReport> {
        let options = QueryOptions::new().with_domain(domain);
        self.check(&options).await
    }

    /// Issue one request against the API and decode the envelope.
    async fn fetch(&self, options: &QueryOptions) -> Result<CertificateReport> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SslCheckError::MissingApiKey)?;

        debug!(url = %self.base_url, "Querying certificate checker API");

        let response = self
            .http
            .get(&self.base_url)
            .query(options)
            .header("x-api-key", api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SslCheckError::Timeout(format!("Request to {} timed out", self.base_url))
                } else {
                    SslCheckError::HttpError(e)
                }
            })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SslCheckError::Unauthorized(format!(
                    "request rejected with status {}",
                    status
                )));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(SslCheckError::RateLimited(
                    "request rejected with status 429".to_string(),
                ));
            }
            s if !s.is_success() => {
                return Err(SslCheckError::ApiError(format!(
                    "request failed with status {}",
                    s
                )));
            }
            _ => {}
        }

        let envelope: CheckResponse = response.json().await?;
        report_from_envelope(envelope)
    }
}

/// Unwrap a decoded envelope into its report, surfacing API-side errors.
fn report_from_envelope(envelope: CheckResponse) -> Result<CertificateReport> {
    if !envelope.is_ok() {
        return Err(SslCheckError::ApiError(
            envelope
                .error
                .unwrap_or_else(|| "unknown API error".to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| SslCheckError::ApiError("response envelope contained no data".to_string()))
}

fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_domain_rejected_before_request() {
        let client = CheckClient::new().with_api_key("test-key");
        let err = client.check(&QueryOptions::new()).await.unwrap_err();
        assert!(matches!(err, SslCheckError::MissingDomain));
    }

    #[tokio::test]
    async fn test_invalid_domain_rejected_before_request() {
        let client = CheckClient::new().with_api_key("test-key");
        let err = client.check_domain("not a domain").await.unwrap_err();
        assert!(matches!(err, SslCheckError::InvalidDomain(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_rejected() {
        // No API key configured and no network reachable either way;
        // the key check fires first.
        let client = CheckClient::new()
            .with_retry_policy(RetryPolicy::no_retry())
            .with_base_url("http://127.0.0.1:0/");
        let err = client.check_domain("example.com").await.unwrap_err();
        assert!(matches!(err, SslCheckError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_request_timeout_surfaces_timeout_error() {
        // A listener that accepts connections but never answers, so the
        // request times out rather than failing to connect.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut sockets = Vec::new();
            loop {
                if let Ok((stream, _)) = listener.accept().await {
                    sockets.push(stream);
                }
            }
        });

        let client = CheckClient::new()
            .with_api_key("test-key")
            .with_timeout(Duration::from_millis(100))
            .with_retry_policy(RetryPolicy::no_retry())
            .with_base_url(format!("http://{}/", addr));

        let err = client.check_domain("example.com").await.unwrap_err();
        assert!(matches!(err, SslCheckError::Timeout(_)), "got {:?}", err);
    }

    #[test]
    fn test_report_from_ok_envelope() {
        let envelope: CheckResponse = serde_json::from_str(
            r#"{"status":"ok","error":null,"data":{"domain":"example.com","valid":true}}"#,
        )
        .unwrap();
        let report = report_from_envelope(envelope).unwrap();
        assert_eq!(report.domain.as_deref(), Some("example.com"));
        assert_eq!(report.valid, Some(true));
    }

    #[test]
    fn test_report_from_error_envelope() {
        let envelope: CheckResponse =
            serde_json::from_str(r#"{"status":"error","error":"Invalid domain","data":null}"#)
                .unwrap();
        match report_from_envelope(envelope).unwrap_err() {
            SslCheckError::ApiError(msg) => assert_eq!(msg, "Invalid domain"),
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn test_report_from_ok_envelope_without_data() {
        let envelope: CheckResponse =
            serde_json::from_str(r#"{"status":"ok","error":null,"data":null}"#).unwrap();
        assert!(matches!(
            report_from_envelope(envelope),
            Err(SslCheckError::ApiError(_))
        ));
    }
}
