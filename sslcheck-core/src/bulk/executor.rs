use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::check::{CertificateReport, CheckClient};

pub type ProgressCallback = Box<dyn Fn(usize, usize, &str) + Send + Sync>;

/// Outcome of one certificate check within a bulk run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResult {
    pub domain: String,
    pub success: bool,
    pub report: Option<CertificateReport>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Runs certificate checks over a list of domains with bounded
/// concurrency and a rate-limit delay between requests.
#[derive(Clone)]
pub struct BulkExecutor {
    client: CheckClient,
    concurrency: usize,
    rate_limit_delay: Duration,
}

impl BulkExecutor {
    pub fn new(client: CheckClient) -> Self {
        Self {
            client,
            concurrency: 5,
            rate_limit_delay: Duration::from_millis(200),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_rate_limit(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub async fn execute(
        &self,
        domains: Vec<String>,
        progress: Option<ProgressCallback>,
    ) -> Vec<BulkResult> {
        let total = domains.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        debug!(
            total = total,
            concurrency = self.concurrency,
            "Starting bulk execution"
        );

        let results: Vec<BulkResult> = stream::iter(domains)
            .map(|domain| {
                let semaphore = semaphore.clone();
                let completed = completed.clone();
                let progress = progress.as_ref();
                let rate_limit_delay = self.rate_limit_delay;
                let client = &self.client;

                async move {
                    let _permit = match semaphore.acquire().await {
                        Ok(permit) => permit,
                        Err(_) => {
                            return BulkResult {
                                domain,
                                success: false,
                                report: None,
                                error: Some("Operation cancelled".to_string()),
                                duration_ms: 0,
                            };
                        }
                    };

                    // Rate limiting delay
                    if !rate_limit_delay.is_zero() {
                        sleep(rate_limit_delay).await;
                    }

                    let start = std::time::Instant::now();
                    let result = client.check_domain(&domain).await;
                    let duration_ms = start.elapsed().as_millis() as u64;

                    let count = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(progress) = progress {
                        progress(count, total, &domain);
                    }

                    match result {
                        Ok(report) => BulkResult {
                            domain,
                            success: true,
                            report: Some(report),
                            error: None,
                            duration_ms,
                        },
                        Err(e) => {
                            warn!(domain = %domain, error = %e, "Bulk check failed");
                            BulkResult {
                                domain,
                                success: false,
                                report: None,
                                error: Some(e.to_string()),
                                duration_ms,
                            }
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        results
    }
}

/// Parse a domain list: one per line, `#` for comments, or CSV (uses
/// the first column).
pub fn parse_domains_from_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            // Handle CSV format (take first column)
            line.split(',').next().unwrap_or(line).trim().to_string()
        })
        .filter(|domain| domain.contains('.'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_domains_from_file() {
        let content = r#"
# This is a comment
example.com
apiverve.com
  whitespace.com
invalid
csv,format,example.org
"#;

        let domains = parse_domains_from_file(content);
        assert_eq!(domains.len(), 3);
        assert!(domains.contains(&"example.com".to_string()));
        assert!(domains.contains(&"apiverve.com".to_string()));
        assert!(domains.contains(&"whitespace.com".to_string()));
        // "invalid" and "csv" are filtered out because they don't contain a dot
    }

    #[tokio::test]
    async fn test_bulk_reports_per_domain_failures() {
        // No API key configured, so every check fails without touching
        // the network; the executor must still return one result per
        // domain instead of aborting the run.
        let executor = BulkExecutor::new(CheckClient::new())
            .with_concurrency(2)
            .with_rate_limit(Duration::ZERO);

        let results = executor
            .execute(vec!["a.example.com".to_string(), "b.example.com".to_string()], None)
            .await;

        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(!result.success);
            assert!(result.report.is_none());
            assert!(result.error.is_some());
        }
    }

    #[tokio::test]
    async fn test_bulk_progress_callback() {
        let executor = BulkExecutor::new(CheckClient::new()).with_rate_limit(Duration::ZERO);

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let progress: ProgressCallback = Box::new(move |_done, total, _domain| {
            assert_eq!(total, 2);
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        executor
            .execute(
                vec!["a.example.com".to_string(), "b.example.com".to_string()],
                Some(progress),
            )
            .await;

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
