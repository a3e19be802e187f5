//! HttpAggregationPort against a real server on an ephemeral port

use chrono::NaiveDate;
use pivot_client::{ClientConfig, HttpAggregationPort};
use pivot_engine::drilldown::{OpenPivot, Outcome};
use pivot_engine::port::fetch_pivot_all;
use pivot_engine::{AggregationPort, DrawerState, DrillDownSession, MemoryLedger, SaleRecord};
use pivot_server::{Config, Server, ServerState};
use shared::error::ErrorCode;
use shared::models::{
    Axis, EntityRef, ExportOptions, ExportQuery, MasterRecord, Period, PivotQuery, SortKey,
    SortOrder, SplitBy, SummaryQuery, TopN,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

fn ledger() -> MemoryLedger {
    let customers = (1..=40)
        .map(|n| MasterRecord::new(format!("c{:02}", n), format!("Customer {:02}", n)))
        .collect();
    let ledger = MemoryLedger::new(
        vec![MasterRecord::new("r1", "Rita"), MasterRecord::new("r2", "Sam")],
        customers,
        vec![MasterRecord::new("i1", "Widget")],
    );
    let records = (1..=40u32)
        .map(|n| {
            let date = NaiveDate::from_ymd_opt(2025, 11, n % 28 + 1).unwrap();
            let rep = if n % 2 == 0 { "r1" } else { "r2" };
            SaleRecord::new(rep, format!("c{:02}", n), "i1", date, f64::from(n) * 3.0, 1.0)
        })
        .collect();
    ledger.ingest_all(records).unwrap();
    ledger
}

struct Running {
    port: HttpAggregationPort,
    shutdown: CancellationToken,
}

impl Drop for Running {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn start() -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = Config::with_overrides(addr.port(), None);
    let state = ServerState::with_port(config.clone(), Arc::new(ledger()));
    let shutdown = CancellationToken::new();
    let server = Server::with_state(config, state);
    let token = shutdown.clone();
    tokio::spawn(async move { server.serve(listener, token).await });

    let port = HttpAggregationPort::new(&ClientConfig::new(format!("http://{}", addr))).unwrap();
    Running { port, shutdown }
}

fn november() -> Period {
    Period::parse_month("2025-11").unwrap()
}

#[tokio::test]
async fn test_master_and_summary_round_trip() {
    let server = start().await;

    let reps = server.port.list_sales_reps().await.unwrap();
    assert_eq!(reps.len(), 2);
    assert_eq!(server.port.list_customers().await.unwrap().len(), 40);

    let query = SummaryQuery::new(november(), Axis::Customer)
        .with_reps(["r1"])
        .with_sort(SortKey::Amount, SortOrder::Desc)
        .with_top_n(TopN::Top10);
    let rows = server.port.fetch_summary(&query).await.unwrap();
    assert_eq!(rows[0].top_n.len(), 10);
    assert_eq!(rows[0].top_n[0].id, "c40");
    assert_eq!(rows[0].top_n[0].unit_price(), Some(120.0));
}

#[tokio::test]
async fn test_remote_pages_match_local_result() {
    let server = start().await;
    let query = PivotQuery {
        period: november(),
        base_axis: Axis::Item,
        base_id: "i1".into(),
        target_axis: Axis::Customer,
        rep_ids: Vec::new(),
        filter_ids: Vec::new(),
        sort_by: SortKey::Name,
        order: SortOrder::Asc,
        top_n: TopN::All,
        cursor: None,
    };

    let remote = fetch_pivot_all(&server.port, &query).await.unwrap();
    let local = fetch_pivot_all(&ledger(), &query).await.unwrap();
    assert_eq!(remote.len(), 40);
    assert_eq!(remote, local);
}

#[tokio::test]
async fn test_drill_down_session_over_http() {
    let server = start().await;
    let session = DrillDownSession::new(Arc::new(server.port.clone()));

    let outcome = session
        .open(OpenPivot {
            base_axis: Axis::Item,
            base_id: "i1".into(),
            base_name: "Widget".into(),
            rep_ids: vec!["r1".into(), "r2".into()],
            sort_by: SortKey::Amount,
            order: SortOrder::Desc,
            top_n: TopN::All,
            period: november(),
        })
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Applied {
            axis: Axis::Customer,
            rows: 30,
            has_more: true
        }
    );

    session.load_more(Axis::Customer).await.unwrap();
    let DrawerState::Open(open) = session.snapshot() else {
        panic!("drawer should be open");
    };
    assert_eq!(open.rows(Axis::Customer).len(), 40);
    assert!(!open.can_load_more(Axis::Customer));
}

#[tokio::test]
async fn test_error_envelopes_keep_their_code() {
    let server = start().await;

    let entity = EntityRef {
        axis: Axis::Customer,
        id: "missing".into(),
        rep_ids: Vec::new(),
    };
    let err = server
        .port
        .fetch_daily_series(&november(), &entity)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(!err.is_port_failure());

    let export = ExportQuery {
        query: SummaryQuery::new(november(), Axis::Customer).with_reps(["r9"]),
        options: ExportOptions::default(),
    };
    let err = server.port.export_mode_cube(&export).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_export_documents_are_decoded() {
    let server = start().await;
    let export = ExportQuery {
        query: SummaryQuery::new(november(), Axis::Customer).with_top_n(TopN::Top10),
        options: ExportOptions {
            exclude_zero: true,
            split_by: SplitBy::Rep,
            add_axis_b: false,
            add_axis_c: true,
        },
    };

    let docs = server.port.export_mode_cube(&export).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert!(docs[0].bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    let text = docs[0].text();
    assert!(text.starts_with("rep_id,rep_name,customer_id,"));
    assert!(text.contains(",date_id,"));
    // one non-zero day per customer, 10 customers
    assert_eq!(text.lines().count(), 11);
}

#[tokio::test]
async fn test_unreachable_server_is_a_port_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let port = HttpAggregationPort::new(&ClientConfig::new(format!("http://{}", addr))).unwrap();
    let err = port.list_items().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NetworkError);
    assert!(err.is_port_failure());
}
