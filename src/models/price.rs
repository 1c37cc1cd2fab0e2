use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative decimal amount detected on a page.
///
/// Construction goes through [`PriceValue::new`], so a negative amount can never
/// be observed as a price. Deserialization goes through it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PriceValue(Decimal);

impl PriceValue {
    pub fn new(amount: Decimal) -> Option<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return None;
        }
        Some(Self(amount.normalize()))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for PriceValue {
    type Error = String;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        PriceValue::new(amount).ok_or_else(|| format!("price must not be negative: {}", amount))
    }
}

impl From<PriceValue> for Decimal {
    fn from(price: PriceValue) -> Self {
        price.0
    }
}

impl fmt::Display for PriceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which signal source produced a resolved price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    StructuredData,
    MetaTag,
    Selector,
    BodyText,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::StructuredData => "structured_data",
            Provenance::MetaTag => "meta_tag",
            Provenance::Selector => "selector",
            Provenance::BodyText => "body_text",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running the extraction pipeline over one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Resolved {
        price: PriceValue,
        provenance: Provenance,
    },
    Exhausted,
}

impl ExtractionOutcome {
    pub fn price(&self) -> Option<PriceValue> {
        match self {
            ExtractionOutcome::Resolved { price, .. } => Some(*price),
            ExtractionOutcome::Exhausted => None,
        }
    }

    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            ExtractionOutcome::Resolved { provenance, .. } => Some(*provenance),
            ExtractionOutcome::Exhausted => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ExtractionOutcome::Resolved { .. })
    }
}
