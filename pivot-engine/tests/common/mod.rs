//! Shared fixture ledger for integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use pivot_engine::{MemoryLedger, SaleRecord};
use shared::models::{MasterRecord, Period};

pub fn november() -> Period {
    Period::parse_month("2025-11").unwrap()
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
}

/// 3 reps, 65 customers, 3 items.
///
/// - r1 sells item i1 to every customer `c{n}` for `n * 10` (qty `n`)
/// - r2 sells i2 to c001..c015 where c001/c002 tie on amount (qty breaks it)
/// - r3 has no sales
pub fn fixture() -> MemoryLedger {
    let reps = vec![
        MasterRecord::new("r1", "Rita"),
        MasterRecord::new("r2", "Sam"),
        MasterRecord::new("r3", "Quinn"),
    ];
    let customers = (1..=65)
        .map(|n| MasterRecord::new(format!("c{:03}", n), format!("Customer {:03}", n)))
        .collect();
    let items = vec![
        MasterRecord::new("i1", "Widget"),
        MasterRecord::new("i2", "Gadget"),
        MasterRecord::new("i3", "Doohickey"),
    ];
    let ledger = MemoryLedger::new(reps, customers, items);

    let mut records = Vec::new();
    for n in 1..=65u32 {
        records.push(SaleRecord::new(
            "r1",
            format!("c{:03}", n),
            "i1",
            day(n % 30 + 1),
            f64::from(n) * 10.0,
            f64::from(n),
        ));
    }
    for n in 1..=15u32 {
        let (amount, qty) = match n {
            1 => (500.0, 2.0),
            2 => (500.0, 5.0),
            _ => (f64::from(n) * 7.0, 1.0),
        };
        records.push(SaleRecord::new("r2", format!("c{:03}", n), "i2", day(n), amount, qty));
    }
    ledger.ingest_all(records).unwrap();
    ledger
}
