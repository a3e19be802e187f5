//! Summary ranking, full pagination and export composition over the ledger

mod common;

use pivot_engine::port::fetch_pivot_all;
use pivot_engine::{AggregationPort, MemoryLedger};
use shared::error::ErrorCode;
use shared::models::{
    Axis, EntityRef, ExportOptions, ExportQuery, PivotQuery, SortKey, SortOrder, SplitBy,
    SummaryQuery, TopN,
};

fn ids<'a>(rows: impl IntoIterator<Item = &'a shared::models::MetricEntry>) -> Vec<&'a str> {
    rows.into_iter().map(|e| e.id.as_str()).collect()
}

#[tokio::test]
async fn test_top_ten_by_amount_breaks_ties_on_qty() {
    let ledger = common::fixture();
    let query = SummaryQuery::new(common::november(), Axis::Customer).with_reps(["r2"]);

    let rows = ledger.fetch_summary(&query).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rep_name, "Sam");
    assert_eq!(
        ids(&rows[0].top_n),
        vec!["c002", "c001", "c015", "c014", "c013", "c012", "c011", "c010", "c009", "c008"]
    );
    assert!(
        rows[0]
            .top_n
            .windows(2)
            .all(|w| w[0].amount() >= w[1].amount())
    );
}

#[tokio::test]
async fn test_rep_without_sales_still_gets_zero_rows() {
    let ledger = common::fixture();
    let query = SummaryQuery::new(common::november(), Axis::Item).with_reps(["r3"]);

    let rows = ledger.fetch_summary(&query).await.unwrap();
    let top = &rows[0].top_n;
    assert_eq!(top.len(), 3);
    assert!(top.iter().all(|e| e.is_zero() && e.unit_price().is_none()));
}

#[tokio::test]
async fn test_summary_rows_follow_rep_master_order() {
    let ledger = common::fixture();
    let query = SummaryQuery::new(common::november(), Axis::Item).with_reps(["r3", "r1"]);

    let rows = ledger.fetch_summary(&query).await.unwrap();
    let reps: Vec<_> = rows.iter().map(|r| r.rep_id.as_str()).collect();
    assert_eq!(reps, vec!["r1", "r3"]);

    let err = ledger
        .fetch_summary(&SummaryQuery::new(common::november(), Axis::Item).with_reps(["r9"]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_following_cursors_yields_the_full_sorted_result() {
    let ledger = common::fixture();
    let pivot = PivotQuery {
        period: common::november(),
        base_axis: Axis::Item,
        base_id: "i1".to_string(),
        target_axis: Axis::Customer,
        rep_ids: Vec::new(),
        filter_ids: Vec::new(),
        sort_by: SortKey::Qty,
        order: SortOrder::Asc,
        top_n: TopN::All,
        cursor: None,
    };

    let paged = fetch_pivot_all(&ledger, &pivot).await.unwrap();

    // r1 is the only seller of i1, so its unbounded summary is the same ranking
    let whole = SummaryQuery::new(common::november(), Axis::Customer)
        .with_reps(["r1"])
        .with_sort(SortKey::Qty, SortOrder::Asc)
        .with_top_n(TopN::All);
    let summary = ledger.fetch_summary(&whole).await.unwrap();

    assert_eq!(paged.len(), 65);
    assert_eq!(ids(&paged), ids(&summary[0].top_n));
}

#[tokio::test]
async fn test_malformed_cursor_is_rejected() {
    let ledger = common::fixture();
    let pivot = PivotQuery {
        period: common::november(),
        base_axis: Axis::Customer,
        base_id: "c001".to_string(),
        target_axis: Axis::Item,
        rep_ids: Vec::new(),
        filter_ids: Vec::new(),
        sort_by: SortKey::Amount,
        order: SortOrder::Desc,
        top_n: TopN::All,
        cursor: Some("page-2".to_string()),
    };

    let err = ledger.fetch_pivot(&pivot).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCursor);
}

#[tokio::test]
async fn test_daily_series_is_zero_filled() {
    let ledger = common::fixture();
    let entity = EntityRef {
        axis: Axis::Customer,
        id: "c001".to_string(),
        rep_ids: Vec::new(),
    };

    let series = ledger
        .fetch_daily_series(&common::november(), &entity)
        .await
        .unwrap();
    assert_eq!(series.len(), 30);
    assert_eq!(series[0].date_key, "2025-11-01");

    let active: Vec<_> = series.iter().filter(|p| p.count > 0).collect();
    // c001: r1 on day 2, r2 on day 1
    assert_eq!(active.len(), 2);
    let total: f64 = series.iter().map(|p| p.amount).sum();
    assert!((total - 510.0).abs() < 1e-9);
}

fn export(split_by: SplitBy, exclude_zero: bool) -> ExportQuery {
    ExportQuery {
        query: SummaryQuery::new(common::november(), Axis::Customer).with_reps(["r1", "r2"]),
        options: ExportOptions {
            exclude_zero,
            split_by,
            add_axis_b: true,
            add_axis_c: false,
        },
    }
}

#[tokio::test]
async fn test_export_split_by_rep_writes_one_file_each() {
    let ledger = common::fixture();
    let docs = ledger
        .export_mode_cube(&export(SplitBy::Rep, true))
        .await
        .unwrap();

    let names: Vec<_> = docs.iter().map(|d| d.file_name.as_str()).collect();
    assert_eq!(names, vec!["customer_2025-11_r1.csv", "customer_2025-11_r2.csv"]);

    for doc in &docs {
        assert!(doc.bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    }

    let text = docs[1].text();
    let lines: Vec<_> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(
        lines[0],
        "rep_id,rep_name,customer_id,customer_name,customer_amount,customer_qty,customer_count,customer_unit_price,\
         item_id,item_name,item_amount,item_qty,item_count,item_unit_price"
    );
    // top 10 customers, each with its single non-zero item
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[1], "r2,Sam,c002,Customer 002,500,5,1,100,i2,Gadget,500,5,1,100");
    assert!(lines[1..].iter().all(|l| l.starts_with("r2,")));
}

#[tokio::test]
async fn test_export_without_split_keeps_zero_blocks() {
    let ledger = common::fixture();
    let docs = ledger
        .export_mode_cube(&export(SplitBy::None, false))
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].file_name, "customer_2025-11.csv");
    let text = docs[0].text();
    let lines: Vec<_> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
    // header + 2 reps × 10 customers × 3 items
    assert_eq!(lines.len(), 61);
    assert!(lines[1].starts_with("r1,Rita,c065,"));
}

#[tokio::test]
async fn test_export_without_reps_fails() {
    let ledger = MemoryLedger::default();
    let err = ledger
        .export_mode_cube(&export(SplitBy::None, false))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let query = ExportQuery {
        query: SummaryQuery::new(common::november(), Axis::Item),
        options: ExportOptions::default(),
    };
    let err = ledger.export_mode_cube(&query).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoRepresentatives);
}
