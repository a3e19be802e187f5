//! Aggregated metric rows
//!
//! `MetricEntry::unit_price` is never stored independently: it is derived
//! from `amount / qty` every time either changes, and on deserialization.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::axis::Axis;

/// Decimal places for unit prices
const DECIMAL_PLACES: u32 = 2;

/// Round to 2 decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| {
            d.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
                .to_f64()
                .unwrap_or(value)
        })
        .unwrap_or(value)
}

/// `round2(amount / qty)` when `qty > 0`, else `None`
pub fn derive_unit_price(amount: f64, qty: f64) -> Option<f64> {
    if qty <= 0.0 || !qty.is_finite() {
        return None;
    }
    let exact = match (Decimal::from_f64(amount), Decimal::from_f64(qty)) {
        (Some(a), Some(q)) => a.checked_div(q),
        _ => None,
    };
    Some(match exact {
        Some(d) => d
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or_else(|| round2(amount / qty)),
        None => round2(amount / qty),
    })
}

/// Sum two measures through `Decimal` so that repeated cents do not drift
fn add_exact(a: f64, b: f64) -> f64 {
    match (Decimal::from_f64(a), Decimal::from_f64(b)) {
        (Some(x), Some(y)) => x
            .checked_add(y)
            .and_then(|s| s.normalize().to_f64())
            .unwrap_or(a + b),
        _ => a + b,
    }
}

fn sanitize(field: &'static str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!(field, value, "Clamping invalid metric measure to 0");
        0.0
    }
}

/// Candidate aggregation target (customer, item or calendar day)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseEntry {
    pub id: String,
    pub name: String,
    /// `YYYY-MM-DD`, only for the date axis
    #[serde(rename = "dateKey", default, skip_serializing_if = "Option::is_none")]
    pub date_key: Option<String>,
}

impl UniverseEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date_key: None,
        }
    }

    /// Calendar-day entry: `id` is the compact `YYYYMMDD` form of the date key
    pub fn for_date(date: NaiveDate) -> Self {
        let key = date.format("%Y-%m-%d").to_string();
        Self {
            id: date.format("%Y%m%d").to_string(),
            name: key.clone(),
            date_key: Some(key),
        }
    }
}

/// Aggregate for one universe entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MetricEntryWire")]
pub struct MetricEntry {
    pub id: String,
    pub name: String,
    amount: f64,
    qty: f64,
    count: u64,
    unit_price: Option<f64>,
    #[serde(rename = "dateKey", skip_serializing_if = "Option::is_none")]
    pub date_key: Option<String>,
}

impl MetricEntry {
    /// Zero-valued entry for a universe candidate
    pub fn zero(entry: &UniverseEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            amount: 0.0,
            qty: 0.0,
            count: 0,
            unit_price: None,
            date_key: entry.date_key.clone(),
        }
    }

    /// Entry with explicit totals; invalid measures are clamped to 0
    pub fn with_totals(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: f64,
        qty: f64,
        count: u64,
    ) -> Self {
        let amount = sanitize("amount", amount);
        let qty = sanitize("qty", qty);
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            qty,
            count,
            unit_price: derive_unit_price(amount, qty),
            date_key: None,
        }
    }

    pub fn with_date_key(mut self, key: impl Into<String>) -> Self {
        self.date_key = Some(key.into());
        self
    }

    /// Fold one ledger record into this aggregate
    pub fn accumulate(&mut self, amount: f64, qty: f64) {
        self.amount = add_exact(self.amount, sanitize("amount", amount));
        self.qty = add_exact(self.qty, sanitize("qty", qty));
        self.count += 1;
        self.unit_price = derive_unit_price(self.amount, self.qty);
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn qty(&self) -> f64 {
        self.qty
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }

    /// All three measures are zero
    pub fn is_zero(&self) -> bool {
        self.amount == 0.0 && self.qty == 0.0 && self.count == 0
    }
}

/// Incoming shape; `unit_price` from the wire is ignored and re-derived
#[derive(Deserialize)]
struct MetricEntryWire {
    id: String,
    name: String,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    qty: f64,
    #[serde(default)]
    count: u64,
    #[serde(rename = "dateKey", default)]
    date_key: Option<String>,
}

impl From<MetricEntryWire> for MetricEntry {
    fn from(w: MetricEntryWire) -> Self {
        let mut entry = MetricEntry::with_totals(w.id, w.name, w.amount, w.qty, w.count);
        entry.date_key = w.date_key;
        entry
    }
}

/// One sales representative's ranked slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub rep_id: String,
    pub rep_name: String,
    pub top_n: Vec<MetricEntry>,
}

/// One page of a pivot result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotPage {
    pub rows: Vec<MetricEntry>,
    pub next_cursor: Option<String>,
}

/// Per-day totals for the date-axis detail feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date_key: String,
    pub amount: f64,
    pub qty: f64,
    pub count: u64,
}

/// Entity whose daily series is requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub axis: Axis,
    pub id: String,
    #[serde(default)]
    pub rep_ids: Vec<String>,
}
