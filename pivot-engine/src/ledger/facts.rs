//! Transactional facts and the JSON seed format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::{Axis, MasterRecord};
use std::borrow::Cow;

use crate::universe::{date_id, parse_date_id};

/// One sale line: who sold what to whom, when, for how much
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub rep_id: String,
    pub customer_id: String,
    pub item_id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub qty: f64,
}

impl SaleRecord {
    pub fn new(
        rep_id: impl Into<String>,
        customer_id: impl Into<String>,
        item_id: impl Into<String>,
        date: NaiveDate,
        amount: f64,
        qty: f64,
    ) -> Self {
        Self {
            rep_id: rep_id.into(),
            customer_id: customer_id.into(),
            item_id: item_id.into(),
            date,
            amount,
            qty,
        }
    }

    /// Coordinate of this record along `axis`
    pub fn coordinate(&self, axis: Axis) -> Cow<'_, str> {
        match axis {
            Axis::Customer => Cow::Borrowed(&self.customer_id),
            Axis::Item => Cow::Borrowed(&self.item_id),
            Axis::Date => Cow::Owned(date_id(self.date)),
        }
    }

    /// Whether the record sits at `id` on `axis`
    pub fn matches(&self, axis: Axis, id: &str) -> bool {
        match axis {
            Axis::Customer => self.customer_id == id,
            Axis::Item => self.item_id == id,
            Axis::Date => parse_date_id(id) == Some(self.date),
        }
    }
}

/// Seed file: master data plus records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSeed {
    #[serde(default)]
    pub reps: Vec<MasterRecord>,
    #[serde(default)]
    pub customers: Vec<MasterRecord>,
    #[serde(default)]
    pub items: Vec<MasterRecord>,
    #[serde(default)]
    pub records: Vec<SaleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates() {
        let r = SaleRecord::new(
            "r1",
            "c1",
            "i1",
            NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            10.0,
            1.0,
        );
        assert_eq!(r.coordinate(Axis::Customer), "c1");
        assert_eq!(r.coordinate(Axis::Item), "i1");
        assert_eq!(r.coordinate(Axis::Date), "20251103");

        assert!(r.matches(Axis::Date, "2025-11-03"));
        assert!(r.matches(Axis::Date, "20251103"));
        assert!(!r.matches(Axis::Customer, "c2"));
    }

    #[test]
    fn test_seed_wire_format() {
        let json = r#"{
            "reps": [{"id": "r1", "name": "Rita"}],
            "records": [{"repId": "r1", "customerId": "c1", "itemId": "i1",
                         "date": "2025-11-03", "amount": 12.5, "qty": 2}]
        }"#;
        let seed: LedgerSeed = serde_json::from_str(json).unwrap();
        assert_eq!(seed.reps.len(), 1);
        assert!(seed.customers.is_empty());
        assert_eq!(seed.records[0].qty, 2.0);
    }
}
