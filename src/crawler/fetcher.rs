//! Resource fetcher implementation
//!
//! This module downloads single resources, including:
//! - Building the HTTP client with the configured user agent
//! - HEAD liveness probes that skip dead resources cheaply
//! - GET transfers written atomically to the chapter folder
//! - Retry logic for transient failures
//! - Error classification

use crate::address::Address;
use crate::config::FetchConfig;
use crate::retry::{retry_with_backoff, RetryPolicy, Transient};
use crate::state::ResourceStatus;
use crate::storage::write_atomic;
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by one fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    /// Not found or forbidden; never retried
    #[error("{url} is unavailable (HTTP {status})")]
    Unavailable { url: String, status: u16 },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Transient for FetchError {
    fn is_transient(&self) -> bool {
        matches!(self, FetchError::Status { .. } | FetchError::Network { .. })
    }
}

/// A resource and where its download ended up
#[derive(Debug, Clone)]
pub struct Resource {
    pub address: Address,
    pub destination: PathBuf,
    pub status: ResourceStatus,
    /// Probe-and-transfer rounds made, including the first
    pub attempts: u32,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use page_mirror::config::FetchConfig;
/// use page_mirror::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads resources with a liveness probe and bounded retries
///
/// # Request Flow
///
/// 1. HEAD the address
///    - 403 / 404 → `Skipped`, no retry
///    - any other answer → transfer
/// 2. GET the address
///    - 2xx → body written atomically → `Downloaded`
///    - 403 / 404 → `Skipped`, no retry
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 403 / 404 | Immediate → Skipped |
/// | Other non-2xx on GET | Retry whole round |
/// | Connection error / timeout | Retry whole round |
/// | Disk write error | Immediate → Failed |
/// | Budget exhausted | Failed |
#[derive(Clone)]
pub struct ResourceFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl ResourceFetcher {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Fetches `address` into `destination` and reports the final status
    ///
    /// At most one file is written, and only on success.
    pub async fn fetch(&self, address: &Address, destination: &Path) -> Resource {
        let probed_flag = AtomicBool::new(false);
        let probed = &probed_flag;

        let outcome = retry_with_backoff(&self.retry, "fetch", |_| {
            self.fetch_once(address, destination, probed)
        })
        .await;

        let terminal = match &outcome.result {
            Ok(()) => {
                tracing::info!(
                    chapter = address.chapter(),
                    page = address.page(),
                    "Saved {}",
                    destination.display()
                );
                ResourceStatus::Downloaded
            }
            Err(e @ FetchError::Unavailable { .. }) => {
                tracing::info!("Skipping resource: {}", e);
                ResourceStatus::Skipped
            }
            Err(e) => {
                tracing::warn!(
                    attempts = outcome.attempts,
                    "Giving up on {}: {}",
                    address,
                    e
                );
                ResourceStatus::Failed
            }
        };

        let status = settle(probed_flag.load(Ordering::SeqCst), terminal).unwrap_or_else(|e| {
            tracing::error!("Unexpected resource lifecycle for {}: {}", address, e);
            ResourceStatus::Failed
        });

        Resource {
            address: address.clone(),
            destination: destination.to_path_buf(),
            status,
            attempts: outcome.attempts,
        }
    }

    /// One probe-and-transfer round
    async fn fetch_once(
        &self,
        address: &Address,
        destination: &Path,
        probed: &AtomicBool,
    ) -> Result<(), FetchError> {
        let url = address.as_str();

        let probe = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| network_error(url, e))?;
        if is_permanent(probe.status()) {
            return Err(FetchError::Unavailable {
                url: url.to_string(),
                status: probe.status().as_u16(),
            });
        }
        probed.store(true, Ordering::SeqCst);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(url, e))?;
        let status = response.status();

        if is_permanent(status) {
            return Err(FetchError::Unavailable {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| network_error(url, e))?;

        write_atomic(destination, &body)
            .await
            .map_err(|source| FetchError::Write {
                path: destination.to_path_buf(),
                source,
            })
    }
}

/// Statuses that mean the resource will not appear by asking again
fn is_permanent(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN
}

fn network_error(url: &str, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection refused".to_string()
    } else {
        error.to_string()
    };
    FetchError::Network {
        url: url.to_string(),
        message,
    }
}

/// Walks the lifecycle from `Pending` to `terminal`
fn settle(
    probed: bool,
    terminal: ResourceStatus,
) -> Result<ResourceStatus, crate::MirrorError> {
    let mut status = ResourceStatus::Pending;
    if probed {
        status = status.transition(ResourceStatus::Probed)?;
    }
    status.transition(terminal)
}
