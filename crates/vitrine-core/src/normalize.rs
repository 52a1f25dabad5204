//! Value-level normalization shared by every schema adapter.
//!
//! Stored documents come from several generations of product uploads, so any
//! field can be missing, mistyped, or formatted differently. Every helper here
//! is total: bad input yields `None` or a neutral value, never an error.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Trim and lowercase, the folding applied to every string filter and
/// classification field.
#[must_use]
pub fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Returns the first key in `keys` holding a non-blank string (or a number,
/// rendered as text).
#[must_use]
pub fn first_text(doc: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match doc.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Parses a price-like value: JSON numbers, or strings such as `"1,299.00"`,
/// `"₹ 899"` or `"Rs. 450"`. Finite values beyond the decimal range saturate
/// to [`Decimal::MAX`] or [`Decimal::MIN`].
#[must_use]
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(saturating_from_f64)
            }
        }
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches("Rs.")
                .trim_start_matches("Rs")
                .chars()
                .filter(|c| !matches!(c, ',' | '₹' | '$' | ' '))
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            Decimal::from_str(&cleaned)
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().and_then(saturating_from_f64))
        }
        _ => None,
    }
}

fn saturating_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).or(Some(if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}

/// First parseable decimal among `keys`.
#[must_use]
pub fn first_decimal(doc: &Map<String, Value>, keys: &[&str]) -> Option<Decimal> {
    keys.iter()
        .find_map(|key| doc.get(*key).and_then(parse_decimal))
}

/// Interprets loosely typed boolean flags (`true`, `"true"`, `"yes"`, `1`).
#[must_use]
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(fold(s).as_str(), "true" | "yes" | "1"),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Non-negative whole stock count; anything unparseable is zero.
#[must_use]
pub fn stock_count(value: Option<&Value>) -> i64 {
    value
        .and_then(parse_decimal)
        .and_then(|d| d.trunc().to_i64())
        .unwrap_or(0)
        .max(0)
}

/// Normalized price block shared by every schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFields {
    pub mrp: Decimal,
    pub final_price: Decimal,
    pub discount_percent: Decimal,
    pub original_price: Decimal,
}

impl PriceFields {
    #[must_use]
    pub fn zero() -> Self {
        Self {
            mrp: Decimal::ZERO,
            final_price: Decimal::ZERO,
            discount_percent: Decimal::ZERO,
            original_price: Decimal::ZERO,
        }
    }
}

/// Raw price inputs as found in a stored document, before reconciliation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPrices {
    pub mrp: Option<Decimal>,
    pub price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub original_price: Option<Decimal>,
}

/// Reconciles raw price inputs into the canonical price block.
///
/// `mrp` falls back to `price`, then `originalPrice`, then `finalPrice`.
/// `finalPrice` is authoritative when present; otherwise it is derived from
/// the discount. A missing discount is back-filled from an explicit
/// `finalPrice` below `mrp`.
#[must_use]
pub fn derive_prices(raw: RawPrices) -> PriceFields {
    let mrp = non_negative(
        raw.mrp
            .or(raw.price)
            .or(raw.original_price)
            .or(raw.final_price)
            .unwrap_or(Decimal::ZERO),
    );
    let explicit_final = raw.final_price.map(non_negative);
    let mut discount_percent = clamp_percent(raw.discount_percent.unwrap_or(Decimal::ZERO));

    let final_price = match explicit_final {
        Some(price) => price,
        None if discount_percent > Decimal::ZERO => mrp
            .checked_mul(discount_percent)
            .and_then(|off| off.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|off| mrp.checked_sub(off))
            .map_or(mrp, |price| non_negative(price).round_dp(2)),
        None => mrp,
    };

    if raw.discount_percent.is_none() && mrp > Decimal::ZERO && final_price < mrp {
        discount_percent = mrp
            .checked_sub(final_price)
            .and_then(|off| off.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|off| off.checked_div(mrp))
            .map_or(Decimal::ZERO, |pct| clamp_percent(pct.round_dp(2)));
    }

    PriceFields {
        mrp,
        final_price,
        discount_percent,
        original_price: raw.original_price.map_or(mrp, non_negative),
    }
}

fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

fn clamp_percent(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Collects image URLs from any of the historical layouts.
///
/// Checked in order: an `images` field (array, numbered-key object, or a
/// single string), top-level `image1..imageN` keys, then the scalar `image`
/// and `thumbnail` fields.
#[must_use]
pub fn collect_images(doc: &Map<String, Value>) -> Vec<String> {
    if let Some(images) = doc.get("images").map(images_from_value) {
        if !images.is_empty() {
            return images;
        }
    }

    let numbered = numbered_images(doc);
    if !numbered.is_empty() {
        return numbered;
    }

    first_text(doc, &["image", "thumbnail"])
        .into_iter()
        .collect()
}

/// Images from a single value: an array keeps its order, an object is read
/// as numbered `imageN` keys, a string is a one-element list.
#[must_use]
pub fn images_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(non_blank_str).collect(),
        Value::Object(map) => numbered_images(map),
        Value::String(_) => non_blank_str(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// `{image1: "a", image3: "c", image2: ""}` becomes `["a", "c"]`: numeric
/// suffix order, blank slots dropped.
fn numbered_images(map: &Map<String, Value>) -> Vec<String> {
    let mut slots: Vec<(u32, String)> = map
        .iter()
        .filter_map(|(key, value)| {
            let slot = key.strip_prefix("image")?.parse::<u32>().ok()?;
            Some((slot, non_blank_str(value)?))
        })
        .collect();
    slots.sort_by_key(|(slot, _)| *slot);
    slots.into_iter().map(|(_, url)| url).collect()
}

fn non_blank_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Parses the timestamp layouts seen in stored documents: RFC 3339 strings,
/// `YYYY-MM-DD HH:MM:SS`, bare dates, epoch milliseconds, and `{"$date": ..}`
/// wrappers from exported dumps.
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|dt| dt.and_utc())
                })
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|dt| dt.and_utc())
                })
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => map.get("$date").and_then(parse_timestamp),
        _ => None,
    }
}
