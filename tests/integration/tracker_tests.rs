use rust_decimal::Decimal;
use std::str::FromStr;
use wishlist_watcher::models::{AddItemRequest, ChangeType};
use wishlist_watcher::store::ItemRepository;
use wishlist_watcher::{AppError, ExtractionOutcome, Provenance};

use super::{FULL_SIGNAL_PAGE, create_test_tracker, get_test_config, mount_page, serve_page};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[tokio::test]
async fn test_add_item_from_product_page() -> anyhow::Result<()> {
    let server = serve_page("/kettle", FULL_SIGNAL_PAGE).await;
    let (tracker, repository) = create_test_tracker(&get_test_config())?;

    let url = format!("{}/kettle", server.uri());
    let item = tracker
        .add_item(AddItemRequest {
            url: url.clone(),
            title: None,
        })
        .await?;

    assert_eq!(item.title, url);
    assert_eq!(item.original_price.amount(), dec("59.95"));
    assert_eq!(item.current_price, item.original_price);
    assert_eq!(item.provenance, Provenance::StructuredData);
    assert_eq!(repository.list().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_add_item_without_price_is_refused() -> anyhow::Result<()> {
    let server = serve_page("/about", "<html><body><h1>About our shop</h1></body></html>").await;
    let (tracker, repository) = create_test_tracker(&get_test_config())?;

    let result = tracker
        .add_item(AddItemRequest {
            url: format!("{}/about", server.uri()),
            title: Some("About".to_string()),
        })
        .await;

    let err = result.expect_err("item without a price must not be created");
    assert!(matches!(err, AppError::PriceNotDetected { .. }));
    assert_eq!(err.to_string(), "Unable to detect a price from that URL.");
    assert!(repository.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_add_item_with_unreachable_page() -> anyhow::Result<()> {
    let server = wiremock::MockServer::start().await;
    let (tracker, repository) = create_test_tracker(&get_test_config())?;

    // Nothing mounted: the mock server answers 404
    let result = tracker
        .add_item(AddItemRequest {
            url: format!("{}/gone", server.uri()),
            title: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::Fetch { .. })));
    assert!(repository.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_recheck_detects_discount() -> anyhow::Result<()> {
    let server = serve_page("/lamp", r#"<meta property="product:price:amount" content="80.00">"#).await;
    let (tracker, repository) = create_test_tracker(&get_test_config())?;

    let item = tracker
        .add_item(AddItemRequest {
            url: format!("{}/lamp", server.uri()),
            title: Some("Desk Lamp".to_string()),
        })
        .await?;

    server.reset().await;
    mount_page(&server, "/lamp", r#"<meta property="product:price:amount" content="60.00">"#).await;

    let change = tracker.recheck_item(item.id).await?;
    assert_eq!(change.change_type, ChangeType::Decreased);
    assert_eq!(change.discount_percent(), 25.0);

    let stored = repository.get(item.id).await?;
    assert_eq!(stored.original_price.amount(), dec("80"));
    assert_eq!(stored.current_price.amount(), dec("60"));
    assert!(stored.last_checked >= item.last_checked);
    Ok(())
}

#[tokio::test]
async fn test_probe_many_keeps_order() -> anyhow::Result<()> {
    let server = serve_page("/a", "<p>Now $10.00</p>").await;
    mount_page(&server, "/b", "<p>Nothing here</p>").await;
    mount_page(&server, "/c", r#"<span class="price">€ 7,50</span>"#).await;
    let (tracker, _) = create_test_tracker(&get_test_config())?;

    let urls: Vec<String> = ["/a", "/b", "/c"]
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect();
    let results = tracker.probe_many(&urls).await;

    assert_eq!(results.len(), 3);
    let outcomes: Vec<ExtractionOutcome> = results.into_iter().map(|r| r.unwrap().outcome).collect();
    assert_eq!(outcomes[0].price().map(|p| p.amount()), Some(dec("10")));
    assert_eq!(outcomes[1], ExtractionOutcome::Exhausted);
    assert_eq!(outcomes[2].provenance(), Some(Provenance::Selector));
    assert_eq!(outcomes[2].price().map(|p| p.amount()), Some(dec("7.5")));
    Ok(())
}
