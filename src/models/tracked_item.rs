use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{PriceValue, Provenance};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedItem {
    pub id: Uuid,
    pub url: String,
    pub title: String,

    // Prices
    pub original_price: PriceValue,
    pub current_price: PriceValue,
    pub provenance: Provenance,

    // Metadata
    pub last_checked: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddItemRequest {
    #[validate(url)]
    pub url: String,
    #[validate(length(max = 200))]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Increased,
    Decreased,
    Unchanged,
}

/// Comparison of a freshly detected price against the price recorded when the item was added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChange {
    pub original: PriceValue,
    pub current: PriceValue,
    pub change_type: ChangeType,
    pub difference: Decimal,
    pub percent_change: Option<f64>,
}

impl PriceChange {
    pub fn between(original: PriceValue, current: PriceValue) -> Self {
        let change_type = if current > original {
            ChangeType::Increased
        } else if current < original {
            ChangeType::Decreased
        } else {
            ChangeType::Unchanged
        };

        let difference = current.amount() - original.amount();
        let percent_change = if !original.amount().is_zero() {
            (difference / original.amount() * Decimal::from(100)).to_f64()
        } else {
            None
        };

        Self {
            original,
            current,
            change_type,
            difference,
            percent_change,
        }
    }

    /// Discount relative to the original price, zero when the price went up or stayed.
    pub fn discount_percent(&self) -> f64 {
        match self.percent_change {
            Some(pct) if pct < 0.0 => -pct,
            _ => 0.0,
        }
    }
}

impl TrackedItem {
    pub fn new(url: String, title: Option<String>, price: PriceValue, provenance: Provenance) -> Self {
        let now = Utc::now();
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| url.clone());

        Self {
            id: Uuid::new_v4(),
            url,
            title,
            original_price: price,
            current_price: price,
            provenance,
            last_checked: now,
            created_at: now,
        }
    }

    /// Record a re-check result, keeping the original price for discount tracking.
    pub fn record_check(&mut self, price: PriceValue, provenance: Provenance) -> PriceChange {
        self.current_price = price;
        self.provenance = provenance;
        self.last_checked = Utc::now();
        self.price_change()
    }

    pub fn price_change(&self) -> PriceChange {
        PriceChange::between(self.original_price, self.current_price)
    }
}
