use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, warn};
use url::Url;

use crate::config::FetcherConfig;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedDocument {
    pub url: String,
    pub final_url: String, // After redirects
    pub status: u16,
    pub body: String,
    pub response_time_ms: u64,
}

/// Supplies the raw body of a page.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument>;
}

#[derive(Debug)]
struct FetchFailure {
    message: String,
    transient: bool,
}

impl From<reqwest::Error> for FetchFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            transient: err.is_timeout() || err.is_connect() || err.is_request(),
            message: err.to_string(),
        }
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let accept_language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| AppError::Validation(format!("Invalid Accept-Language header: {}", e)))?;
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn parse_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|e| AppError::Validation(format!("Invalid URL '{}': {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(AppError::Validation(format!("Unsupported URL scheme: {}", scheme))),
        }
    }

    async fn fetch_once(&self, url: &Url) -> std::result::Result<FetchedDocument, FetchFailure> {
        let start_time = Instant::now();
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure {
                message: format!("server responded with status {}", status),
                transient: status.is_server_error() || status.as_u16() == 429,
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;

        Ok(FetchedDocument {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            body,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        let parsed = Self::parse_url(url)?;
        let strategy = FixedInterval::from_millis(self.config.retry_delay_ms).take(self.config.retry_attempts);

        let result = RetryIf::spawn(
            strategy,
            || self.fetch_once(&parsed),
            |failure: &FetchFailure| {
                if failure.transient {
                    warn!("Retrying fetch of {}: {}", url, failure.message);
                }
                failure.transient
            },
        )
        .await;

        match result {
            Ok(document) => {
                debug!(
                    "Fetched {} ({} bytes, {} ms)",
                    document.final_url,
                    document.body.len(),
                    document.response_time_ms
                );
                Ok(document)
            }
            Err(failure) => Err(AppError::Fetch {
                url: url.to_string(),
                message: failure.message,
            }),
        }
    }
}
