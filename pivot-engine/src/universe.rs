//! Universe generator
//!
//! Produces the ordered candidate set an aggregation runs over. Customers and
//! items come from master data in master order; the date axis yields one entry
//! per calendar day of the period, ascending. Candidates with no activity are
//! still part of the universe and aggregate to zero rows.

use chrono::NaiveDate;
use shared::models::{Axis, MasterRecord, Period, UniverseEntry};

/// Master lists the universe is drawn from
#[derive(Debug, Clone, Copy)]
pub struct Universe<'a> {
    customers: &'a [MasterRecord],
    items: &'a [MasterRecord],
}

impl<'a> Universe<'a> {
    pub fn new(customers: &'a [MasterRecord], items: &'a [MasterRecord]) -> Self {
        Self { customers, items }
    }

    /// Every candidate of `axis` for `period`
    pub fn entries(&self, axis: Axis, period: &Period) -> Vec<UniverseEntry> {
        match axis {
            Axis::Customer => self.customers.iter().map(UniverseEntry::from).collect(),
            Axis::Item => self.items.iter().map(UniverseEntry::from).collect(),
            Axis::Date => period.days().into_iter().map(UniverseEntry::for_date).collect(),
        }
    }

    /// Candidates restricted to `filter_ids` (empty means no restriction)
    ///
    /// Date filters match either the compact id or the `YYYY-MM-DD` key.
    pub fn filtered(
        &self,
        axis: Axis,
        period: &Period,
        filter_ids: &[String],
    ) -> Vec<UniverseEntry> {
        let mut entries = self.entries(axis, period);
        if !filter_ids.is_empty() {
            entries.retain(|e| {
                filter_ids.iter().any(|f| {
                    *f == e.id || e.date_key.as_deref().is_some_and(|k| k == f.as_str())
                })
            });
        }
        entries
    }

    /// Display name of one entity, if it belongs to the universe
    pub fn resolve(&self, axis: Axis, id: &str) -> Option<UniverseEntry> {
        match axis {
            Axis::Customer => self.customers.iter().find(|r| r.id == id).map(UniverseEntry::from),
            Axis::Item => self.items.iter().find(|r| r.id == id).map(UniverseEntry::from),
            Axis::Date => parse_date_id(id).map(UniverseEntry::for_date),
        }
    }
}

/// Canonical coordinate id of a calendar day (`YYYYMMDD`)
pub fn date_id(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Accepts both `YYYYMMDD` and `YYYY-MM-DD`
pub fn parse_date_id(id: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(id, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(id, "%Y-%m-%d"))
        .ok()
}
