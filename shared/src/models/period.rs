//! Reporting period (single month or inclusive month range)
//!
//! On the wire a period is one of
//! `{"month": "YYYY-MM"}` or `{"monthRange": {"from": "YYYY-MM", "to": "YYYY-MM"}}`.
//! In memory it is a tagged union, so the "exactly one" rule cannot be broken
//! once a value exists.

use crate::error::{AppError, AppResult, ErrorCode};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month, formatted `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(AppError::invalid_period(format!(
                "Invalid month: {:04}-{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // year/month are range-checked in `new`
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || {
            AppError::invalid_period(format!("Expected YYYY-MM, got {:?}", s))
                .with_detail("value", s)
        };
        let (y, m) = s.split_once('-').ok_or_else(bad)?;
        if y.len() != 4 || m.len() != 2 || !y.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        Self::new(year, month).map_err(|_| bad())
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> Self {
        ym.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "PeriodWire", try_from = "PeriodWire")]
pub enum Period {
    Month(YearMonth),
    Range { from: YearMonth, to: YearMonth },
}

impl Period {
    pub fn month(ym: YearMonth) -> Self {
        Period::Month(ym)
    }

    /// Inclusive month range; `from` must not be after `to`
    pub fn range(from: YearMonth, to: YearMonth) -> AppResult<Self> {
        if from > to {
            return Err(AppError::invalid_period(format!(
                "Range start {} is after range end {}",
                from, to
            ))
            .with_detail("from", from.to_string())
            .with_detail("to", to.to_string()));
        }
        Ok(Period::Range { from, to })
    }

    /// Parse a single `YYYY-MM` month
    pub fn parse_month(s: &str) -> AppResult<Self> {
        Ok(Period::Month(s.parse()?))
    }

    /// Parse a `YYYY-MM` .. `YYYY-MM` range
    pub fn parse_range(from: &str, to: &str) -> AppResult<Self> {
        Self::range(from.parse()?, to.parse()?)
    }

    pub fn start_month(&self) -> YearMonth {
        match *self {
            Period::Month(m) => m,
            Period::Range { from, .. } => from,
        }
    }

    pub fn end_month(&self) -> YearMonth {
        match *self {
            Period::Month(m) => m,
            Period::Range { to, .. } => to,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start_month().first_day()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end_month().last_day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first_day() <= date && date <= self.last_day()
    }

    /// Every calendar day of the period, ascending
    pub fn days(&self) -> Vec<NaiveDate> {
        let last = self.last_day();
        let mut out = Vec::new();
        let mut day = self.first_day();
        while day <= last {
            out.push(day);
            match day.checked_add_days(Days::new(1)) {
                Some(next) => day = next,
                None => break,
            }
        }
        out
    }

    /// Compact label used in export file names (`2025-11`, `2025-09_2025-11`)
    pub fn label(&self) -> String {
        match self {
            Period::Month(m) => m.to_string(),
            Period::Range { from, to } => format!("{}_{}", from, to),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month(m) => write!(f, "{}", m),
            Period::Range { from, to } => write!(f, "{}..{}", from, to),
        }
    }
}

/// Wire shape with two optional keys; resolved into [`Period`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_range: Option<MonthRangeWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRangeWire {
    pub from: String,
    pub to: String,
}

impl PeriodWire {
    pub fn resolve(self) -> AppResult<Period> {
        match (self.month, self.month_range) {
            (Some(_), Some(_)) => Err(AppError::new(ErrorCode::PeriodConflict)),
            (None, None) => Err(AppError::new(ErrorCode::PeriodMissing)),
            (Some(month), None) => Period::parse_month(&month),
            (None, Some(range)) => Period::parse_range(&range.from, &range.to),
        }
    }
}

impl TryFrom<PeriodWire> for Period {
    type Error = AppError;

    fn try_from(wire: PeriodWire) -> Result<Self, Self::Error> {
        wire.resolve()
    }
}

impl From<Period> for PeriodWire {
    fn from(period: Period) -> Self {
        match period {
            Period::Month(m) => PeriodWire {
                month: Some(m.to_string()),
                month_range: None,
            },
            Period::Range { from, to } => PeriodWire {
                month: None,
                month_range: Some(MonthRangeWire {
                    from: from.to_string(),
                    to: to.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[test]
    fn test_year_month_parse() {
        let m = ym("2025-11");
        assert_eq!(m.year(), 2025);
        assert_eq!(m.month(), 11);
        assert_eq!(m.to_string(), "2025-11");

        for bad in ["2025-13", "2025-00", "2025-1", "25-11", "2025/11", "abcd-ef", ""] {
            let err = bad.parse::<YearMonth>().unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidPeriod, "{}", bad);
        }
    }

    #[test]
    fn test_month_bounds() {
        let feb = ym("2024-02");
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let dec = ym("2025-12");
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_range_rejects_reversed() {
        let err = Period::range(ym("2025-11"), ym("2025-09")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPeriod);
        assert!(Period::range(ym("2025-09"), ym("2025-09")).is_ok());
    }

    #[test]
    fn test_days_and_contains() {
        let p = Period::parse_range("2025-11", "2025-12").unwrap();
        let days = p.days();
        assert_eq!(days.len(), 61);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(days[60], NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());

        assert!(p.contains(NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(!p.contains(NaiveDate::from_ymd_opt(2025, 10, 31).unwrap()));
    }

    #[test]
    fn test_label() {
        assert_eq!(Period::parse_month("2025-11").unwrap().label(), "2025-11");
        assert_eq!(
            Period::parse_range("2025-09", "2025-11").unwrap().label(),
            "2025-09_2025-11"
        );
    }

    #[test]
    fn test_wire_forms() {
        let p: Period = serde_json::from_str(r#"{"month":"2025-11"}"#).unwrap();
        assert_eq!(p, Period::Month(ym("2025-11")));
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"month":"2025-11"}"#);

        let p: Period =
            serde_json::from_str(r#"{"monthRange":{"from":"2025-09","to":"2025-11"}}"#).unwrap();
        assert_eq!(
            p,
            Period::Range {
                from: ym("2025-09"),
                to: ym("2025-11")
            }
        );
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"monthRange":{"from":"2025-09","to":"2025-11"}}"#
        );
    }

    #[test]
    fn test_wire_exclusivity() {
        let both = PeriodWire {
            month: Some("2025-11".into()),
            month_range: Some(MonthRangeWire {
                from: "2025-09".into(),
                to: "2025-11".into(),
            }),
        };
        assert_eq!(both.resolve().unwrap_err().code, ErrorCode::PeriodConflict);
        assert_eq!(
            PeriodWire::default().resolve().unwrap_err().code,
            ErrorCode::PeriodMissing
        );

        let result: Result<Period, _> =
            serde_json::from_str(r#"{"month":"2025-11","monthRange":{"from":"2025-09","to":"2025-11"}}"#);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("Only one of month or monthRange"), "{}", msg);
    }
}
