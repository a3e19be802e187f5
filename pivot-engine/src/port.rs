//! Aggregation port
//!
//! The contract an external data source satisfies. The port owns no logic of
//! its own beyond the request/response shapes: implementations must return
//! rows already ordered by [`crate::sort::compare`] and windowed by
//! [`crate::cursor`].

use async_trait::async_trait;
use shared::error::AppResult;
use shared::models::{
    CsvDocument, DailyPoint, EntityRef, ExportQuery, MasterRecord, MetricEntry, Period, PivotPage,
    PivotQuery, SummaryQuery, SummaryRow,
};

#[async_trait]
pub trait AggregationPort: Send + Sync {
    /// One row per requested representative with its ranked top-N slice
    async fn fetch_summary(&self, query: &SummaryQuery) -> AppResult<Vec<SummaryRow>>;

    /// One page of the pivot of `base_id` along `target_axis`
    async fn fetch_pivot(&self, query: &PivotQuery) -> AppResult<PivotPage>;

    /// Zero-filled per-day totals for one entity
    async fn fetch_daily_series(&self, period: &Period, entity: &EntityRef)
    -> AppResult<Vec<DailyPoint>>;

    /// Composed CSV documents for an export request
    async fn export_mode_cube(&self, query: &ExportQuery) -> AppResult<Vec<CsvDocument>>;

    async fn list_sales_reps(&self) -> AppResult<Vec<MasterRecord>>;

    async fn list_customers(&self) -> AppResult<Vec<MasterRecord>>;

    async fn list_items(&self) -> AppResult<Vec<MasterRecord>>;
}

/// Follow `next_cursor` until exhausted and concatenate every page
///
/// Fixed top-N queries return after the first call.
pub async fn fetch_pivot_all<P>(port: &P, query: &PivotQuery) -> AppResult<Vec<MetricEntry>>
where
    P: AggregationPort + ?Sized,
{
    let mut page_query = query.clone().with_cursor(None);
    let mut rows = Vec::new();
    loop {
        let page = port.fetch_pivot(&page_query).await?;
        rows.extend(page.rows);
        match page.next_cursor {
            Some(next) if query.top_n.is_all() => page_query.cursor = Some(next),
            _ => break,
        }
    }
    Ok(rows)
}
