//! Cursor pagination protocol
//!
//! A cursor is the decimal string of a zero-based offset into the sorted
//! result. The data source re-sorts on every call and slices a window of
//! [`PAGE_SIZE`] rows; `next_cursor` is `None` once the window reaches the end.
//! Fixed top-N requests bypass cursors and return the truncated slice whole.

use shared::error::{AppError, AppResult};
use shared::models::{MetricEntry, PivotPage, TopN};

/// Rows per page for `topN = "all"`; a property of the data source
pub const PAGE_SIZE: usize = 30;

pub fn encode(offset: usize) -> String {
    offset.to_string()
}

/// `None` means "from the beginning"
pub fn decode(cursor: Option<&str>) -> AppResult<usize> {
    let Some(raw) = cursor else {
        return Ok(0);
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::invalid_cursor(raw));
    }
    raw.parse::<usize>().map_err(|_| AppError::invalid_cursor(raw))
}

/// Window an already-sorted result according to `top_n` and `cursor`
pub fn paginate(
    mut sorted: Vec<MetricEntry>,
    top_n: TopN,
    cursor: Option<&str>,
) -> AppResult<PivotPage> {
    if let Some(limit) = top_n.limit() {
        if cursor.is_some() {
            tracing::debug!(top_n = %top_n, "Ignoring cursor for fixed top-N request");
        }
        sorted.truncate(limit);
        return Ok(PivotPage {
            rows: sorted,
            next_cursor: None,
        });
    }

    let offset = decode(cursor)?;
    let total = sorted.len();
    if offset >= total {
        return Ok(PivotPage::default());
    }

    let end = (offset + PAGE_SIZE).min(total);
    let next_cursor = (end < total).then(|| encode(end));
    tracing::debug!(offset, end, total, "Pivot page window");

    let rows = sorted.drain(offset..end).collect();
    Ok(PivotPage { rows, next_cursor })
}
