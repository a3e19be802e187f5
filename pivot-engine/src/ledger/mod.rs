//! In-memory ledger
//!
//! `MemoryLedger` answers every [`AggregationPort`] call by scanning a vector
//! of [`SaleRecord`]s. It is the reference data source behind the HTTP service
//! and the fixture used by the engine's own tests.

mod facts;

pub use facts::{LedgerSeed, SaleRecord};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::error::{AppError, AppResult};
use shared::models::{
    Axis, CsvDocument, DailyPoint, EntityRef, ExportQuery, MasterRecord, MetricEntry, Period,
    PivotPage, PivotQuery, SummaryQuery, SummaryRow, UniverseEntry,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::cursor;
use crate::export::{ExportComposer, ExportSource};
use crate::port::AggregationPort;
use crate::sort::sort_entries;
use crate::universe::Universe;

/// Aggregate `records` into one row per universe entry (zeros included)
pub fn aggregate<'r>(
    records: impl IntoIterator<Item = &'r SaleRecord>,
    group: Axis,
    universe: &[UniverseEntry],
) -> Vec<MetricEntry> {
    let index: HashMap<&str, usize> = universe
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id.as_str(), i))
        .collect();
    let mut rows: Vec<MetricEntry> = universe.iter().map(MetricEntry::zero).collect();

    for record in records {
        if let Some(&i) = index.get(record.coordinate(group).as_ref()) {
            rows[i].accumulate(record.amount, record.qty);
        }
    }
    rows
}

#[derive(Debug, Default)]
struct LedgerData {
    reps: Vec<MasterRecord>,
    customers: Vec<MasterRecord>,
    items: Vec<MasterRecord>,
    records: Vec<SaleRecord>,
}

impl LedgerData {
    fn universe(&self) -> Universe<'_> {
        Universe::new(&self.customers, &self.items)
    }

    fn validate(&self, record: &SaleRecord) -> AppResult<()> {
        for (field, value) in [("amount", record.amount), ("qty", record.qty)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::invalid_record(format!(
                    "{} must be a finite non-negative number, got {}",
                    field, value
                ))
                .with_detail("field", field));
            }
        }
        let known = |list: &[MasterRecord], id: &str| list.iter().any(|r| r.id == id);
        for (field, list, id) in [
            ("repId", &self.reps, &record.rep_id),
            ("customerId", &self.customers, &record.customer_id),
            ("itemId", &self.items, &record.item_id),
        ] {
            if !known(list, id) {
                return Err(AppError::invalid_record(format!("Unknown {}: {}", field, id))
                    .with_detail("field", field)
                    .with_detail("id", id.as_str()));
            }
        }
        Ok(())
    }

    /// Requested reps in master order, or all reps when none requested
    fn resolve_reps(&self, rep_ids: &[String]) -> AppResult<Vec<MasterRecord>> {
        if rep_ids.is_empty() {
            return Ok(self.reps.clone());
        }
        if let Some(missing) = rep_ids.iter().find(|id| !self.reps.iter().any(|r| &r.id == *id)) {
            return Err(AppError::not_found(format!("Sales rep {}", missing)));
        }
        Ok(self
            .reps
            .iter()
            .filter(|r| rep_ids.contains(&r.id))
            .cloned()
            .collect())
    }

    /// Records of `period` sold by any of `rep_ids` (all reps when empty)
    fn scoped<'a>(
        &'a self,
        period: &'a Period,
        rep_ids: &'a [String],
    ) -> impl Iterator<Item = &'a SaleRecord> + 'a {
        let reps: HashSet<&str> = rep_ids.iter().map(String::as_str).collect();
        self.records.iter().filter(move |r| {
            period.contains(r.date) && (reps.is_empty() || reps.contains(r.rep_id.as_str()))
        })
    }

    fn summary(&self, query: &SummaryQuery) -> AppResult<Vec<SummaryRow>> {
        let reps = self.resolve_reps(&query.rep_ids)?;
        let universe = self
            .universe()
            .filtered(query.mode, &query.period, &query.filter_ids);

        let rows = reps
            .into_iter()
            .map(|rep| {
                let scope = [rep.id.clone()];
                let records = self.scoped(&query.period, &scope);
                let mut top_n = aggregate(records, query.mode, &universe);
                sort_entries(&mut top_n, query.sort_by, query.order);
                if let Some(limit) = query.top_n.limit() {
                    top_n.truncate(limit);
                }
                SummaryRow {
                    rep_id: rep.id,
                    rep_name: rep.name,
                    top_n,
                }
            })
            .collect();
        Ok(rows)
    }

    fn pivot(&self, query: &PivotQuery) -> AppResult<PivotPage> {
        query.validate()?;
        let universe = self.universe();
        if universe.resolve(query.base_axis, &query.base_id).is_none() {
            return Err(AppError::not_found(format!(
                "{} {}",
                query.base_axis.label(),
                query.base_id
            )));
        }
        self.resolve_reps(&query.rep_ids)?;

        let targets = universe.filtered(query.target_axis, &query.period, &query.filter_ids);
        let records = self
            .scoped(&query.period, &query.rep_ids)
            .filter(|r| r.matches(query.base_axis, &query.base_id));
        let mut rows = aggregate(records, query.target_axis, &targets);
        sort_entries(&mut rows, query.sort_by, query.order);

        tracing::debug!(
            base_axis = %query.base_axis,
            base_id = %query.base_id,
            target_axis = %query.target_axis,
            candidates = rows.len(),
            cursor = ?query.cursor,
            "Pivot aggregated"
        );
        cursor::paginate(rows, query.top_n, query.cursor.as_deref())
    }

    fn daily(&self, period: &Period, entity: &EntityRef) -> AppResult<Vec<DailyPoint>> {
        if self.universe().resolve(entity.axis, &entity.id).is_none() {
            return Err(AppError::not_found(format!(
                "{} {}",
                entity.axis.label(),
                entity.id
            )));
        }
        let days = self.universe().entries(Axis::Date, period);
        let records = self
            .scoped(period, &entity.rep_ids)
            .filter(|r| r.matches(entity.axis, &entity.id));

        Ok(aggregate(records, Axis::Date, &days)
            .into_iter()
            .map(|e| DailyPoint {
                date_key: e.date_key.clone().unwrap_or_else(|| e.name.clone()),
                amount: e.amount(),
                qty: e.qty(),
                count: e.count(),
            })
            .collect())
    }
}

impl ExportSource for LedgerData {
    fn sales_reps(&self) -> &[MasterRecord] {
        &self.reps
    }

    fn universe(&self) -> Universe<'_> {
        LedgerData::universe(self)
    }

    fn records_in(&self, period: &Period) -> Vec<&SaleRecord> {
        self.records.iter().filter(|r| period.contains(r.date)).collect()
    }
}

/// Thread-safe in-memory aggregation source
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: RwLock<LedgerData>,
}

impl MemoryLedger {
    /// Empty ledger over the given master data
    pub fn new(
        reps: Vec<MasterRecord>,
        customers: Vec<MasterRecord>,
        items: Vec<MasterRecord>,
    ) -> Self {
        Self {
            inner: RwLock::new(LedgerData {
                reps,
                customers,
                items,
                records: Vec::new(),
            }),
        }
    }

    pub fn from_seed(seed: LedgerSeed) -> AppResult<Self> {
        let ledger = Self::new(seed.reps, seed.customers, seed.items);
        ledger.ingest_all(seed.records)?;
        Ok(ledger)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read ledger seed: {}", e))
                .with_detail("path", path.display().to_string())
        })?;
        let seed: LedgerSeed = serde_json::from_str(&raw)?;
        let ledger = Self::from_seed(seed)?;
        tracing::info!(
            path = %path.display(),
            records = ledger.len(),
            "Ledger seed loaded"
        );
        Ok(ledger)
    }

    /// Validate and append one record
    pub fn ingest(&self, record: SaleRecord) -> AppResult<()> {
        let mut data = self.inner.write();
        data.validate(&record)?;
        data.records.push(record);
        Ok(())
    }

    /// Validate every record first; nothing is appended if any is invalid
    pub fn ingest_all(&self, records: Vec<SaleRecord>) -> AppResult<usize> {
        let mut data = self.inner.write();
        for (index, record) in records.iter().enumerate() {
            data.validate(record).map_err(|e| e.with_detail("index", index))?;
        }
        let n = records.len();
        data.records.extend(records);
        Ok(n)
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AggregationPort for MemoryLedger {
    async fn fetch_summary(&self, query: &SummaryQuery) -> AppResult<Vec<SummaryRow>> {
        self.inner.read().summary(query)
    }

    async fn fetch_pivot(&self, query: &PivotQuery) -> AppResult<PivotPage> {
        self.inner.read().pivot(query)
    }

    async fn fetch_daily_series(
        &self,
        period: &Period,
        entity: &EntityRef,
    ) -> AppResult<Vec<DailyPoint>> {
        self.inner.read().daily(period, entity)
    }

    async fn export_mode_cube(&self, query: &ExportQuery) -> AppResult<Vec<CsvDocument>> {
        let data = self.inner.read();
        ExportComposer::new(&*data).compose(query)
    }

    async fn list_sales_reps(&self) -> AppResult<Vec<MasterRecord>> {
        Ok(self.inner.read().reps.clone())
    }

    async fn list_customers(&self) -> AppResult<Vec<MasterRecord>> {
        Ok(self.inner.read().customers.clone())
    }

    async fn list_items(&self) -> AppResult<Vec<MasterRecord>> {
        Ok(self.inner.read().items.clone())
    }
}
