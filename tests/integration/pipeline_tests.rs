use rust_decimal::Decimal;
use std::str::FromStr;
use wishlist_watcher::{ExtractionOutcome, PriceExtractor, Provenance, RawDocument};

use super::FULL_SIGNAL_PAGE;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn detect(html: &str) -> Option<(Decimal, Provenance)> {
    match PriceExtractor::new().extract_from_html(html) {
        ExtractionOutcome::Resolved { price, provenance } => Some((price.amount(), provenance)),
        ExtractionOutcome::Exhausted => None,
    }
}

#[test]
fn test_structured_data_outranks_markup_and_text() {
    assert_eq!(detect(FULL_SIGNAL_PAGE), Some((dec("59.95"), Provenance::StructuredData)));
}

#[test]
fn test_graph_with_aggregate_offer() {
    let html = r#"<html><head>
        <script type="application/ld+json">
        {"@context":"https://schema.org","@graph":[
            {"@type":"BreadcrumbList","itemListElement":[{"@type":"ListItem","position":1,"name":"Home"}]},
            {"@type":"Product","name":"Desk Lamp","offers":{"@type":"AggregateOffer","lowPrice":"24.99","highPrice":"39.99","offerCount":3}}
        ]}
        </script>
    </head><body></body></html>"#;

    assert_eq!(detect(html), Some((dec("24.99"), Provenance::StructuredData)));
}

#[test]
fn test_european_shop_meta_tag() {
    let html = r#"<html lang="de"><head>
        <meta property="product:price:amount" content="1.249,90">
        <meta property="product:price:currency" content="EUR">
    </head><body><span class="price">1.299,90 €</span></body></html>"#;

    assert_eq!(detect(html), Some((dec("1249.9"), Provenance::MetaTag)));
}

#[test]
fn test_microdata_price_element() {
    let html = r#"<html><body>
        <div itemscope itemtype="https://schema.org/Product">
            <span itemprop="name">Walking Boots</span>
            <span itemprop="price">£89.00</span>
        </div>
    </body></html>"#;

    assert_eq!(detect(html), Some((dec("89"), Provenance::Selector)));
}

#[test]
fn test_body_text_only_page() {
    let html = "<html><body><p>Now just $49.99 — save big!</p></body></html>";
    assert_eq!(detect(html), Some((dec("49.99"), Provenance::BodyText)));
}

#[test]
fn test_page_without_any_price_is_exhausted() {
    let html = r#"<html><head><title>Contact</title></head><body>
        <h1>Contact us</h1>
        <p>Open 9 to 5, call 0800 123 456.</p>
        <script>var cart = {"total": "$0.00"};</script>
    </body></html>"#;

    assert_eq!(PriceExtractor::new().extract_from_html(html), ExtractionOutcome::Exhausted);
}

#[test]
fn test_broken_markup_still_extracts() {
    let html = r#"<html><head><meta name="price" content="12,99"<body><div class="price">oops"#;
    assert!(PriceExtractor::new().extract_from_html(html).is_resolved());
}

#[test]
fn test_repeated_extraction_is_identical() {
    let extractor = PriceExtractor::new();
    let doc = RawDocument::parse(FULL_SIGNAL_PAGE);

    let outcomes: Vec<ExtractionOutcome> = (0..3).map(|_| extractor.extract(&doc)).collect();
    assert!(outcomes.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_shared_extractor_across_threads() {
    let extractor = std::sync::Arc::new(PriceExtractor::new());

    let handles: Vec<_> = ["$10.00", "$20.00", "$30.00"]
        .into_iter()
        .map(|price| {
            let extractor = extractor.clone();
            std::thread::spawn(move || {
                let html = format!("<p>Only {}</p>", price);
                extractor.extract_from_html(&html).price().map(|p| p.amount())
            })
        })
        .collect();

    let found: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(found, vec![Some(dec("10")), Some(dec("20")), Some(dec("30"))]);
}
