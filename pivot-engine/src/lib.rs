//! Pivot Engine - multi-axis aggregation core
//!
//! # Modules
//!
//! - **universe**: candidate entities per axis and period
//! - **sort**: canonical multi-key ordering of metric rows
//! - **cursor**: offset cursors over a sorted result (page size 30)
//! - **port**: the `AggregationPort` contract every data source implements
//! - **drilldown**: drawer reducer plus the async session driving it
//! - **export**: CSV composition (BOM, CRLF, optional per-rep split)
//! - **ledger**: `MemoryLedger`, an in-memory aggregation source
//!
//! ```text
//! SummaryQuery ──► AggregationPort ──► SummaryRow[]
//!                        ▲
//! DrillDownSession ──────┘  PivotQuery (+cursor) ──► PivotPage
//! ExportQuery ──► ExportComposer ──► CsvDocument[]
//! ```

pub mod cursor;
pub mod drilldown;
pub mod export;
pub mod ledger;
pub mod port;
pub mod sort;
pub mod universe;

pub use cursor::PAGE_SIZE;
pub use drilldown::{DrawerCommand, DrawerState, DrillDownSession, Effect};
pub use export::{ExportComposer, ExportSource};
pub use ledger::{LedgerSeed, MemoryLedger, SaleRecord};
pub use port::AggregationPort;
pub use sort::{compare, sort_entries};
pub use universe::Universe;
