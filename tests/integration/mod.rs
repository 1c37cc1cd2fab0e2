// Integration tests for Wishlist Watcher
// These tests serve real HTML over HTTP and run it through the fetcher, the
// extraction pipeline and the tracker together

pub mod pipeline_tests;
pub mod tracker_tests;

use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wishlist_watcher::{
    AppConfig, PriceExtractor,
    config::{ExtractorConfig, FetcherConfig, TrackerConfig},
    fetcher::HttpFetcher,
    store::InMemoryItemRepository,
    tracker::WishlistTracker,
};

/// Test configuration with short timeouts and fast retries
pub fn get_test_config() -> AppConfig {
    AppConfig {
        fetcher: FetcherConfig {
            user_agent: "WishlistWatcher-Test/1.0".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_secs: 5,
            retry_attempts: 2,
            retry_delay_ms: 10,
        },
        extractor: ExtractorConfig::default(),
        tracker: TrackerConfig {
            max_concurrent_checks: 2,
        },
    }
}

/// Start a mock shop serving `body` as HTML at `route`
pub async fn serve_page(route: &str, body: &str) -> MockServer {
    let server = MockServer::start().await;
    mount_page(&server, route, body).await;
    server
}

pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

pub fn create_test_tracker(config: &AppConfig) -> anyhow::Result<(WishlistTracker, Arc<InMemoryItemRepository>)> {
    let repository = Arc::new(InMemoryItemRepository::new());
    let tracker = WishlistTracker::new(
        Arc::new(HttpFetcher::new(config.fetcher.clone())?),
        repository.clone(),
        PriceExtractor::from_config(&config.extractor)?,
        config.tracker.clone(),
    );
    Ok((tracker, repository))
}

/// A product page carrying every kind of price signal, each with a different value
pub const FULL_SIGNAL_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Stainless Kettle 1.7L</title>
    <meta property="og:price:amount" content="64.00">
    <meta property="og:price:currency" content="USD">
    <script type="application/ld+json">
    {
        "@context": "https://schema.org/",
        "@type": "Product",
        "name": "Stainless Kettle 1.7L",
        "sku": "KT-1700",
        "offers": {
            "@type": "Offer",
            "priceCurrency": "USD",
            "price": "59.95",
            "availability": "https://schema.org/InStock"
        }
    }
    </script>
</head>
<body>
    <h1>Stainless Kettle 1.7L</h1>
    <div class="product-price">$62.00</div>
    <p>Free shipping on orders over $75.00</p>
</body>
</html>"#;
