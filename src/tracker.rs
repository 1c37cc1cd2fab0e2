use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::TrackerConfig;
use crate::extraction::PriceExtractor;
use crate::fetcher::DocumentFetcher;
use crate::models::{AddItemRequest, ExtractionOutcome, PriceChange, TrackedItem};
use crate::store::ItemRepository;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub url: String,
    pub final_url: String,
    pub outcome: ExtractionOutcome,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecheckResult {
    pub item_id: Uuid,
    pub success: bool,
    pub change: Option<PriceChange>,
    pub error: Option<String>,
}

/// Keeps wishlist items and their prices current.
pub struct WishlistTracker {
    fetcher: Arc<dyn DocumentFetcher>,
    repository: Arc<dyn ItemRepository>,
    extractor: PriceExtractor,
    config: TrackerConfig,
}

impl WishlistTracker {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        repository: Arc<dyn ItemRepository>,
        extractor: PriceExtractor,
        config: TrackerConfig,
    ) -> Self {
        Self {
            fetcher,
            repository,
            extractor,
            config,
        }
    }

    /// Fetch a page and detect its price without storing anything.
    pub async fn probe(&self, url: &str) -> Result<ProbeResult> {
        let document = self.fetcher.fetch(url).await?;
        let outcome = self.extractor.extract_from_html(&document.body);

        Ok(ProbeResult {
            url: url.to_string(),
            final_url: document.final_url,
            outcome,
            response_time_ms: document.response_time_ms,
        })
    }

    /// Probe several pages concurrently; results keep the order of `urls`.
    pub async fn probe_many(&self, urls: &[String]) -> Vec<Result<ProbeResult>> {
        stream::iter(urls)
            .map(|url| self.probe(url))
            .buffered(self.config.max_concurrent_checks.max(1))
            .collect()
            .await
    }

    /// Start tracking a page. Refused when no price can be detected on it.
    pub async fn add_item(&self, request: AddItemRequest) -> Result<TrackedItem> {
        request.validate()?;

        let probe = self.probe(&request.url).await?;
        let ExtractionOutcome::Resolved { price, provenance } = probe.outcome else {
            warn!("No price detected on {}, item not created", request.url);
            return Err(AppError::PriceNotDetected { url: request.url });
        };

        let item = TrackedItem::new(request.url, request.title, price, provenance);
        self.repository.insert(item.clone()).await?;

        info!("Tracking {} at {} (detected from {})", item.url, price, provenance);
        Ok(item)
    }

    /// Detect the current price of a stored item and compare it with the original.
    ///
    /// On failure the stored item is left as it was.
    pub async fn recheck_item(&self, id: Uuid) -> Result<PriceChange> {
        let mut item = self.repository.get(id).await?;

        let probe = self.probe(&item.url).await?;
        let ExtractionOutcome::Resolved { price, provenance } = probe.outcome else {
            return Err(AppError::PriceNotDetected { url: item.url });
        };

        let change = item.record_check(price, provenance);
        self.repository.update(item).await?;

        info!(
            "Rechecked item {}: {} -> {} ({:.1}% off)",
            id,
            change.original,
            change.current,
            change.discount_percent()
        );
        Ok(change)
    }

    pub async fn recheck_all(&self) -> Result<Vec<RecheckResult>> {
        let items = self.repository.list().await?;

        let results = stream::iter(items)
            .map(|item| async move {
                match self.recheck_item(item.id).await {
                    Ok(change) => RecheckResult {
                        item_id: item.id,
                        success: true,
                        change: Some(change),
                        error: None,
                    },
                    Err(e) => {
                        warn!("Recheck of {} failed: {}", item.url, e);
                        RecheckResult {
                            item_id: item.id,
                            success: false,
                            change: None,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .buffer_unordered(self.config.max_concurrent_checks.max(1))
            .collect()
            .await;

        Ok(results)
    }

    pub async fn list_items(&self) -> Result<Vec<TrackedItem>> {
        self.repository.list().await
    }

    pub async fn remove_item(&self, id: Uuid) -> Result<()> {
        self.repository.delete(id).await
    }
}
