use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::PriceValue;

/// Turn a raw price-looking string into an unambiguous decimal.
///
/// Everything except digits, `,` and `.` is discarded first. When both separators
/// appear, whichever comes last is the decimal separator and the other one is
/// grouping. A lone `,` is a decimal separator only when at most two digits follow
/// it, so `2,500` reads as two thousand five hundred while `12,99` reads as 12.99.
pub fn normalize(raw: &str) -> Option<PriceValue> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if stripped.is_empty() {
        return None;
    }

    let canonical = canonicalize_separators(&stripped);
    parse_leading_decimal(&canonical)
}

fn canonicalize_separators(stripped: &str) -> String {
    match (stripped.rfind('.'), stripped.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => with_decimal_at(stripped, comma),
        (Some(_), Some(_)) => stripped.replace(',', ""),
        (None, Some(comma)) => {
            // Input is ASCII by now, byte offsets are character offsets
            let decimals = stripped.len() - comma - 1;
            if decimals <= 2 {
                with_decimal_at(stripped, comma)
            } else {
                stripped.replace(',', "")
            }
        }
        _ => stripped.to_string(),
    }
}

/// Keep digits, turn the separator at `index` into `.`, drop every other separator.
fn with_decimal_at(stripped: &str, index: usize) -> String {
    stripped
        .char_indices()
        .filter_map(|(i, c)| {
            if i == index {
                Some('.')
            } else if c.is_ascii_digit() {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Parse the longest leading `digits[.digits]` run; trailing garbage such as a
/// second dot is ignored the way a float-prefix reader would.
fn parse_leading_decimal(canonical: &str) -> Option<PriceValue> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut digits = 0;

    for (i, c) in canonical.char_indices() {
        match c {
            '0'..='9' => digits += 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if digits == 0 {
        return None;
    }

    let number = canonical[..end].trim_end_matches('.');
    let number = if number.starts_with('.') {
        format!("0{}", number)
    } else {
        number.to_string()
    };

    // Overflowing amounts fail here and count as not found
    Decimal::from_str(&number).ok().and_then(PriceValue::new)
}
