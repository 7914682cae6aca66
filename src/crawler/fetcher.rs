//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with the browser-identifying user agent
//! - The [`Transport`] capability that performs one GET
//! - Status acceptance policies
//! - Bounded retry with linear backoff on transport failures

use crate::config::FetcherConfig;
use crate::crawler::pacing::Sleeper;
use crate::crawler::retry::{RetryDecision, RetryPolicy};
use crate::{FetchFailure, Unavailable};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Status line and decoded body of one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Capability to perform a single HTTP GET
///
/// Implementations report connection errors, timeouts and body read errors as
/// [`FetchFailure::Transport`]. Any HTTP status is a response, not a failure.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchFailure>;
}

/// Transport over a shared reqwest client (one connection pool per run)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(classify_transport_error(&e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchFailure::Transport(classify_transport_error(&e)))?;

        Ok(RawResponse { status, body })
    }
}

fn classify_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timeout: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}

/// Builds an HTTP client with the configured identity and timeout
///
/// # Example
///
/// ```no_run
/// use employer_harvest::config::FetcherConfig;
/// use employer_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Which HTTP statuses count as a usable page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Exactly 200 (listing and job pages)
    RequireOk,
    /// Any 2xx (profile pages)
    RequireSuccess,
}

impl StatusPolicy {
    pub fn accepts(self, status: u16) -> bool {
        match self {
            Self::RequireOk => status == 200,
            Self::RequireSuccess => (200..300).contains(&status),
        }
    }
}

/// Fetches pages through a transport, retrying transient failures
pub struct Fetcher<T, S> {
    transport: T,
    sleeper: S,
    retry: RetryPolicy,
}

impl<T: Transport, S: Sleeper> Fetcher<T, S> {
    pub fn new(transport: T, sleeper: S, retry: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            retry,
        }
    }

    /// The sleeper used for backoff, shared with callers for politeness delays
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Fetches a page body
    ///
    /// Never fails for expected network conditions; an exhausted or refused
    /// fetch comes back as [`Unavailable`] carrying the last cause.
    pub async fn fetch(&self, url: &str, policy: StatusPolicy) -> Result<String, Unavailable> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let failure = match self.transport.get(url).await {
                Ok(response) if policy.accepts(response.status) => return Ok(response.body),
                Ok(response) => {
                    tracing::warn!("Unexpected status {} for {}", response.status, url);
                    FetchFailure::UnexpectedStatus(response.status)
                }
                Err(failure) => failure,
            };

            match self.retry.after_failure(attempt, &failure) {
                RetryDecision::Retry(delay) => {
                    tracing::warn!(
                        "Fetch error for {}: {} (retry {}/{} in {:?})",
                        url,
                        failure,
                        attempt,
                        self.retry.max_attempts(),
                        delay
                    );
                    self.sleeper.sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    if failure.is_retryable() {
                        tracing::error!(
                            "Fetch failed after {} attempt(s) for {}: {}",
                            attempt,
                            url,
                            failure
                        );
                    }
                    return Err(Unavailable {
                        url: url.to_string(),
                        attempts: attempt,
                        cause: failure,
                    });
                }
            }
        }
    }
}
