//! Sort & tie-break engine
//!
//! One pure comparator, applied with a stable sort. Rule table:
//!
//! | key                            | primary                         | tie-breaks             |
//! |--------------------------------|---------------------------------|------------------------|
//! | `date`                         | `dateKey` (else `name`)         | amount, qty, name      |
//! | `name`                         | name (case-folded, then raw)    | amount, qty            |
//! | `amount` `qty` `count` `unit_price` | numeric                    | amount, qty, name      |
//!
//! Every level runs in the requested direction. A `null` unit price sorts
//! after all priced rows in both directions. Rows that tie on every rule are
//! ordered by ascending id so the order is total.

use shared::models::{MetricEntry, SortKey, SortOrder};
use std::cmp::Ordering;

/// Name comparison: case-insensitive first, raw bytes as the final word
pub fn name_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn date_cmp(a: &MetricEntry, b: &MetricEntry) -> Ordering {
    let ka = a.date_key.as_deref().unwrap_or(&a.name);
    let kb = b.date_key.as_deref().unwrap_or(&b.name);
    ka.cmp(kb)
}

fn amount_qty(a: &MetricEntry, b: &MetricEntry) -> Ordering {
    a.amount()
        .total_cmp(&b.amount())
        .then_with(|| a.qty().total_cmp(&b.qty()))
}

fn directed(ord: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

/// Canonical order between two rows
pub fn compare(a: &MetricEntry, b: &MetricEntry, key: SortKey, order: SortOrder) -> Ordering {
    let tail = || amount_qty(a, b).then_with(|| name_cmp(&a.name, &b.name));

    let ord = match key {
        SortKey::Date => directed(date_cmp(a, b).then_with(tail), order),
        SortKey::Name => directed(name_cmp(&a.name, &b.name).then_with(|| amount_qty(a, b)), order),
        SortKey::Amount => directed(tail(), order),
        SortKey::Qty => directed(a.qty().total_cmp(&b.qty()).then_with(tail), order),
        SortKey::Count => directed(a.count().cmp(&b.count()).then_with(tail), order),
        SortKey::UnitPrice => match (a.unit_price(), b.unit_price()) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y).then_with(tail), order),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => directed(tail(), order),
        },
    };

    ord.then_with(|| a.id.cmp(&b.id))
}

/// Sort rows in place under the canonical order
pub fn sort_entries(rows: &mut [MetricEntry], key: SortKey, order: SortOrder) {
    rows.sort_by(|a, b| compare(a, b, key, order));
}
