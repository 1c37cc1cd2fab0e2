//! JSON-LD price search.
//!
//! Commerce pages describe products with schema.org data whose shape varies a lot:
//! the price may sit on the product itself, inside `offers` (an object or an array of
//! them), inside `priceSpecification`, or somewhere under an `@graph`. The search
//! looks at the direct price fields of a node before descending, and descends into
//! `offers` and `priceSpecification` before any other child.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::normalizer::normalize;
use crate::models::PriceValue;

const DIRECT_PRICE_KEYS: [&str; 3] = ["price", "lowPrice", "highPrice"];
const PREFERRED_CHILD_KEYS: [&str; 2] = ["offers", "priceSpecification"];

/// Scan structured-data blocks in document order and return the first price found.
///
/// A block that is not valid JSON is skipped.
pub fn extract_from_structured_blocks<S: AsRef<str>>(blocks: &[S]) -> Option<PriceValue> {
    for (index, block) in blocks.iter().enumerate() {
        let data: Value = match serde_json::from_str(block.as_ref()) {
            Ok(data) => data,
            Err(e) => {
                warn!("Skipping malformed structured-data block {}: {}", index, e);
                continue;
            }
        };

        if let Some(price) = find_price(&data) {
            debug!("Structured-data block {} yielded price {}", index, price);
            return Some(price);
        }
    }
    None
}

/// Depth-first search of a parsed JSON tree.
pub fn find_price(value: &Value) -> Option<PriceValue> {
    match value {
        Value::Array(entries) => entries.iter().find_map(find_price),
        Value::Object(record) => find_price_in_record(record),
        _ => None,
    }
}

fn find_price_in_record(record: &Map<String, Value>) -> Option<PriceValue> {
    for key in DIRECT_PRICE_KEYS {
        if let Some(price) = record.get(key).and_then(scalar_price) {
            return Some(price);
        }
    }

    for key in PREFERRED_CHILD_KEYS {
        if let Some(price) = record.get(key).and_then(find_price) {
            return Some(price);
        }
    }

    record
        .iter()
        .filter(|(key, _)| !PREFERRED_CHILD_KEYS.contains(&key.as_str()))
        .find_map(|(_, nested)| find_price(nested))
}

/// Read a price field. Strings and numbers both go through the normalizer, so
/// `-5` and `"-5"` read the same.
fn scalar_price(value: &Value) -> Option<PriceValue> {
    match value {
        Value::String(text) => normalize(text),
        Value::Number(number) => {
            let text = number.to_string();
            if text.contains(|c: char| c == 'e' || c == 'E') {
                // Exponent forms would lose their exponent in the normalizer
                number
                    .as_f64()
                    .map(f64::abs)
                    .and_then(Decimal::from_f64)
                    .and_then(PriceValue::new)
            } else {
                normalize(&text)
            }
        }
        _ => None,
    }
}
