use regex::Regex;
use tracing::debug;

use super::normalizer::normalize;
use crate::models::PriceValue;
use crate::utils::error::{AppError, Result};

pub const DEFAULT_CURRENCY_SYMBOLS: [&str; 5] = ["$", "€", "£", "¥", "₹"];

/// Last-resort scan for the first currency-prefixed amount in page text.
#[derive(Debug, Clone)]
pub struct BodyTextExtractor {
    price_regex: Regex,
}

impl BodyTextExtractor {
    pub fn new<S: AsRef<str>>(currency_symbols: &[S]) -> Result<Self> {
        if currency_symbols.is_empty() {
            return Err(AppError::Validation("At least one currency symbol is required".into()));
        }

        let symbols = currency_symbols
            .iter()
            .map(|s| regex::escape(s.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        // Grouped thousands (1,234 / 1.234.567) or a plain digit run, then an optional
        // two-digit fractional part
        let pattern = format!(
            r"(?:{})\s?(?:\d{{1,3}}(?:[.,]\d{{3}})+|\d+)(?:[.,]\d{{2}})?",
            symbols
        );
        let price_regex = Regex::new(&pattern)
            .map_err(|e| AppError::Validation(format!("Invalid currency symbol set: {}", e)))?;

        Ok(Self { price_regex })
    }

    pub fn extract(&self, text: &str) -> Option<PriceValue> {
        let found = self.price_regex.find(text)?;
        debug!("Body text candidate '{}'", found.as_str());
        normalize(found.as_str())
    }
}

impl Default for BodyTextExtractor {
    fn default() -> Self {
        Self::new(&DEFAULT_CURRENCY_SYMBOLS).expect("built-in currency symbols form a valid pattern")
    }
}
