use scraper::{Html, Selector};
use tracing::debug;

use super::document::RawDocument;
use super::normalizer::normalize;
use crate::models::{PriceValue, Provenance};
use crate::utils::error::{AppError, Result};

/// Metadata tags whose `content` attribute declares a price, most standard first.
pub const DEFAULT_META_SELECTORS: [&str; 5] = [
    r#"meta[property="product:price:amount"]"#,
    r#"meta[property="og:price:amount"]"#,
    r#"meta[name="price"]"#,
    r#"meta[itemprop="price"]"#,
    r#"meta[name="twitter:data1"]"#,
];

/// Visible price containers, most specific first.
pub const DEFAULT_PRICE_SELECTORS: [&str; 6] = [
    r#"[itemprop="price"]"#,
    r#"[data-testid*="price"]"#,
    r#"[data-test*="price"]"#,
    ".price",
    ".product-price",
    ".product__price",
];

#[derive(Debug)]
struct CompiledSelector {
    source: String,
    selector: Selector,
}

impl CompiledSelector {
    fn parse(source: &str) -> Result<Self> {
        let selector = Selector::parse(source)
            .map_err(|e| AppError::Validation(format!("Invalid CSS selector '{}': {:?}", source, e)))?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }
}

/// Meta-tag pass followed by the visible-selector pass.
#[derive(Debug)]
pub struct MarkupExtractor {
    meta_selectors: Vec<CompiledSelector>,
    price_selectors: Vec<CompiledSelector>,
}

impl MarkupExtractor {
    pub fn new<S: AsRef<str>>(meta_selectors: &[S], price_selectors: &[S]) -> Result<Self> {
        Ok(Self {
            meta_selectors: meta_selectors
                .iter()
                .map(|s| CompiledSelector::parse(s.as_ref()))
                .collect::<Result<_>>()?,
            price_selectors: price_selectors
                .iter()
                .map(|s| CompiledSelector::parse(s.as_ref()))
                .collect::<Result<_>>()?,
        })
    }

    pub fn extract(&self, doc: &RawDocument) -> Option<(PriceValue, Provenance)> {
        let html = doc.html();
        self.extract_from_meta(html)
            .map(|price| (price, Provenance::MetaTag))
            .or_else(|| self.extract_from_selectors(html).map(|price| (price, Provenance::Selector)))
    }

    fn extract_from_meta(&self, html: &Html) -> Option<PriceValue> {
        for compiled in &self.meta_selectors {
            let content = html
                .select(&compiled.selector)
                .next()
                .and_then(|element| element.value().attr("content"));

            if let Some(price) = content.and_then(normalize) {
                debug!("Meta tag {} yielded price {}", compiled.source, price);
                return Some(price);
            }
        }
        None
    }

    fn extract_from_selectors(&self, html: &Html) -> Option<PriceValue> {
        for compiled in &self.price_selectors {
            let text = html
                .select(&compiled.selector)
                .next()
                .map(|element| element.text().collect::<String>());

            if let Some(price) = text.as_deref().and_then(normalize) {
                debug!("Selector {} yielded price {}", compiled.source, price);
                return Some(price);
            }
        }
        None
    }
}

impl Default for MarkupExtractor {
    fn default() -> Self {
        // The built-in selector lists are constants and always parse
        Self::new(&DEFAULT_META_SELECTORS, &DEFAULT_PRICE_SELECTORS)
            .expect("built-in price selectors are valid CSS")
    }
}
