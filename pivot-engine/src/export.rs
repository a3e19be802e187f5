//! Export composer
//!
//! Turns an export query into one or more CSV documents. The row grain is
//! representative × base entity, expanded by each added axis in precedence
//! order. Every block carries `id, name, amount, qty, count, unit_price` for
//! its axis; the innermost block decides `excludeZero`.

use csv::{Terminator, WriterBuilder};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Axis, CsvDocument, ExportQuery, MasterRecord, MetricEntry, Period, SplitBy, SummaryQuery,
    UniverseEntry,
};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::ledger::{SaleRecord, aggregate};
use crate::sort::sort_entries;
use crate::universe::Universe;

const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Data the composer needs from a source
pub trait ExportSource {
    fn sales_reps(&self) -> &[MasterRecord];

    fn universe(&self) -> Universe<'_>;

    /// Every record dated inside `period`; called once per export
    fn records_in(&self, period: &Period) -> Vec<&SaleRecord>;
}

pub struct ExportComposer<'a, S: ExportSource + ?Sized> {
    source: &'a S,
}

/// Per-request state shared by every rep's expansion
struct Plan<'q> {
    query: &'q SummaryQuery,
    exclude_zero: bool,
    inner_axes: Vec<Axis>,
    universes: HashMap<Axis, Vec<UniverseEntry>>,
}

impl Plan<'_> {
    fn universe(&self, axis: Axis) -> &[UniverseEntry] {
        self.universes.get(&axis).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<'a, S: ExportSource + ?Sized> ExportComposer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn compose(&self, export: &ExportQuery) -> AppResult<Vec<CsvDocument>> {
        let query = &export.query;
        let options = export.options;
        let reps = self.resolve_reps(&query.rep_ids)?;

        let axes = options.axes(query.mode);
        let universe = self.source.universe();
        let mut universes = HashMap::new();
        universes.insert(
            query.mode,
            universe.filtered(query.mode, &query.period, &query.filter_ids),
        );
        for axis in &axes[1..] {
            universes.insert(*axis, universe.entries(*axis, &query.period));
        }

        let plan = Plan {
            query,
            exclude_zero: options.exclude_zero,
            inner_axes: axes[1..].to_vec(),
            universes,
        };
        let mut by_rep: HashMap<&str, Vec<&SaleRecord>> = HashMap::new();
        for record in self.source.records_in(&query.period) {
            by_rep.entry(record.rep_id.as_str()).or_default().push(record);
        }
        let rep_records =
            |rep: &MasterRecord| by_rep.get(rep.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);

        let header = header(&axes);
        let stem = format!("{}_{}", query.mode.as_str(), query.period.label());

        let documents = match options.split_by {
            SplitBy::None => {
                let mut rows = Vec::new();
                for rep in &reps {
                    rows.extend(rep_rows(&plan, rep, rep_records(rep)));
                }
                vec![write_document(format!("{}.csv", stem), &header, rows)?]
            }
            SplitBy::Rep => reps
                .iter()
                .map(|rep| {
                    let name = format!("{}_{}.csv", stem, file_safe(&rep.id));
                    write_document(name, &header, rep_rows(&plan, rep, rep_records(rep)))
                })
                .collect::<AppResult<Vec<_>>>()?,
        };

        tracing::info!(
            mode = %query.mode,
            period = %query.period,
            reps = reps.len(),
            documents = documents.len(),
            split_by = ?options.split_by,
            "Export composed"
        );
        Ok(documents)
    }

    fn resolve_reps(&self, rep_ids: &[String]) -> AppResult<Vec<MasterRecord>> {
        let all = self.source.sales_reps();
        let reps: Vec<MasterRecord> = if rep_ids.is_empty() {
            all.to_vec()
        } else {
            if let Some(missing) = rep_ids.iter().find(|id| !all.iter().any(|r| &r.id == *id)) {
                return Err(AppError::not_found(format!("Sales rep {}", missing)));
            }
            all.iter()
                .filter(|r| rep_ids.contains(&r.id))
                .cloned()
                .collect()
        };
        if reps.is_empty() {
            return Err(AppError::new(ErrorCode::NoRepresentatives));
        }
        Ok(reps)
    }
}

/// Group `records` by their coordinate on `axis`
fn bucket<'r>(
    records: &[&'r SaleRecord],
    axis: Axis,
) -> HashMap<Cow<'r, str>, Vec<&'r SaleRecord>> {
    let mut buckets: HashMap<Cow<'r, str>, Vec<&'r SaleRecord>> = HashMap::new();
    for &record in records {
        buckets.entry(record.coordinate(axis)).or_default().push(record);
    }
    buckets
}

fn rep_rows(plan: &Plan<'_>, rep: &MasterRecord, records: &[&SaleRecord]) -> Vec<Vec<String>> {
    let query = plan.query;
    let mut base = aggregate(records.iter().copied(), query.mode, plan.universe(query.mode));
    sort_entries(&mut base, query.sort_by, query.order);
    if let Some(limit) = query.top_n.limit() {
        base.truncate(limit);
    }

    let buckets = bucket(records, query.mode);
    let mut out = Vec::new();
    let mut blocks = Vec::new();
    for entry in base {
        let inside = buckets.get(entry.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        blocks.push(entry);
        expand(plan, rep, &plan.inner_axes, inside, &mut blocks, &mut out);
        blocks.pop();
    }
    out
}

/// Emit the rows under `blocks`, where `records` are exactly the records
/// located at every block's coordinate
fn expand(
    plan: &Plan<'_>,
    rep: &MasterRecord,
    remaining: &[Axis],
    records: &[&SaleRecord],
    blocks: &mut Vec<MetricEntry>,
    out: &mut Vec<Vec<String>>,
) {
    // a zero block can only contain zero blocks
    if plan.exclude_zero && blocks.last().is_some_and(MetricEntry::is_zero) {
        return;
    }

    let Some((axis, rest)) = remaining.split_first() else {
        out.push(row(rep, blocks));
        return;
    };

    let mut entries = aggregate(records.iter().copied(), *axis, plan.universe(*axis));
    sort_entries(&mut entries, plan.query.sort_by, plan.query.order);

    let buckets = bucket(records, *axis);
    for entry in entries {
        let inside = buckets.get(entry.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        blocks.push(entry);
        expand(plan, rep, rest, inside, blocks, out);
        blocks.pop();
    }
}

fn header(axes: &[Axis]) -> Vec<String> {
    let mut cols = vec!["rep_id".to_string(), "rep_name".to_string()];
    for axis in axes {
        for field in ["id", "name", "amount", "qty", "count", "unit_price"] {
            cols.push(format!("{}_{}", axis.as_str(), field));
        }
    }
    cols
}

fn row(rep: &MasterRecord, blocks: &[MetricEntry]) -> Vec<String> {
    let mut cells = vec![harden(&rep.id), harden(&rep.name)];
    for block in blocks {
        cells.push(harden(&block.id));
        cells.push(harden(&block.name));
        cells.push(block.amount().to_string());
        cells.push(block.qty().to_string());
        cells.push(block.count().to_string());
        cells.push(block.unit_price().map(|p| p.to_string()).unwrap_or_default());
    }
    cells
}

/// Prefix cells a spreadsheet would evaluate as a formula
fn harden(text: &str) -> String {
    match text.trim_start().chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{}", text),
        _ => text.to_string(),
    }
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn write_document(
    file_name: String,
    header: &[String],
    rows: Vec<Vec<String>>,
) -> AppResult<CsvDocument> {
    let fail = |e: &dyn std::fmt::Display| {
        AppError::export_failed(format!("Failed to write {}: {}", file_name, e))
    };

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::from(BOM));
    writer.write_record(header).map_err(|e| fail(&e))?;
    for r in &rows {
        writer.write_record(r).map_err(|e| fail(&e))?;
    }
    let bytes = writer.into_inner().map_err(|e| fail(&e))?;

    tracing::debug!(
        file_name = %file_name,
        rows = rows.len(),
        bytes = bytes.len(),
        "CSV document written"
    );
    Ok(CsvDocument { file_name, bytes })
}
