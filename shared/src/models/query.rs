//! Query parameter records
//!
//! All queries are immutable values. Builders return a new value per call,
//! mirroring how callers tweak one parameter and re-issue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::axis::Axis;
use super::period::Period;
use crate::error::{AppError, AppResult, ErrorCode};

// ============================================================================
// Sort parameters
// ============================================================================

/// Primary sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Amount,
    Qty,
    Count,
    UnitPrice,
    Date,
    Name,
}

impl SortKey {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortKey::Amount => "amount",
            SortKey::Qty => "qty",
            SortKey::Count => "count",
            SortKey::UnitPrice => "unit_price",
            SortKey::Date => "date",
            SortKey::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amount" => Ok(SortKey::Amount),
            "qty" => Ok(SortKey::Qty),
            "count" => Ok(SortKey::Count),
            "unit_price" => Ok(SortKey::UnitPrice),
            "date" => Ok(SortKey::Date),
            "name" => Ok(SortKey::Name),
            other => Err(AppError::new(ErrorCode::InvalidSortKey).with_detail("sortBy", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

// ============================================================================
// Top-N
// ============================================================================

/// Requested result size: a fixed count or unbounded
///
/// Wire form is a bare number (`10`, `20`, `50`) or the string `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "TopNWire", try_from = "TopNWire")]
pub enum TopN {
    #[default]
    Top10,
    Top20,
    Top50,
    All,
}

impl TopN {
    /// Row limit, `None` for unbounded
    pub const fn limit(&self) -> Option<usize> {
        match self {
            TopN::Top10 => Some(10),
            TopN::Top20 => Some(20),
            TopN::Top50 => Some(50),
            TopN::All => None,
        }
    }

    pub const fn is_all(&self) -> bool {
        matches!(self, TopN::All)
    }
}

impl TryFrom<u64> for TopN {
    type Error = AppError;

    fn try_from(n: u64) -> Result<Self, Self::Error> {
        match n {
            10 => Ok(TopN::Top10),
            20 => Ok(TopN::Top20),
            50 => Ok(TopN::Top50),
            other => Err(AppError::new(ErrorCode::InvalidTopN).with_detail("topN", other)),
        }
    }
}

impl FromStr for TopN {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(TopN::All);
        }
        s.parse::<u64>()
            .map_err(|_| AppError::new(ErrorCode::InvalidTopN).with_detail("topN", s))
            .and_then(TopN::try_from)
    }
}

impl fmt::Display for TopN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit() {
            Some(n) => write!(f, "{}", n),
            None => f.write_str("all"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopNWire {
    Count(u64),
    Text(String),
}

impl From<TopN> for TopNWire {
    fn from(top: TopN) -> Self {
        match top.limit() {
            Some(n) => TopNWire::Count(n as u64),
            None => TopNWire::Text("all".to_string()),
        }
    }
}

impl TryFrom<TopNWire> for TopN {
    type Error = AppError;

    fn try_from(wire: TopNWire) -> Result<Self, Self::Error> {
        match wire {
            TopNWire::Count(n) => TopN::try_from(n),
            TopNWire::Text(s) => s.parse(),
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Per-representative top-N query over one base axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    #[serde(flatten)]
    pub period: Period,
    pub mode: Axis,
    /// Empty means all representatives
    #[serde(default)]
    pub rep_ids: Vec<String>,
    /// Empty means all candidates of the mode axis
    #[serde(default)]
    pub filter_ids: Vec<String>,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub top_n: TopN,
}

impl SummaryQuery {
    pub fn new(period: Period, mode: Axis) -> Self {
        Self {
            period,
            mode,
            rep_ids: Vec::new(),
            filter_ids: Vec::new(),
            sort_by: SortKey::default(),
            order: SortOrder::default(),
            top_n: TopN::default(),
        }
    }

    pub fn with_reps(mut self, rep_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.rep_ids = rep_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.filter_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    pub fn with_top_n(mut self, top_n: TopN) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Re-aggregation of one base entity along another axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotQuery {
    #[serde(flatten)]
    pub period: Period,
    pub base_axis: Axis,
    pub base_id: String,
    pub target_axis: Axis,
    #[serde(default)]
    pub rep_ids: Vec<String>,
    #[serde(default)]
    pub filter_ids: Vec<String>,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub top_n: TopN,
    /// Offset cursor, only meaningful for `topN = "all"`
    #[serde(default)]
    pub cursor: Option<String>,
}

impl PivotQuery {
    /// Reject structurally invalid pivots before any port call
    pub fn validate(&self) -> AppResult<()> {
        if self.base_axis == self.target_axis {
            return Err(AppError::new(ErrorCode::TargetAxisIsBase)
                .with_detail("baseAxis", self.base_axis.as_str())
                .with_detail("targetAxis", self.target_axis.as_str()));
        }
        if self.base_id.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "baseId must not be empty",
            ));
        }
        Ok(())
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// How export documents are partitioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitBy {
    #[default]
    None,
    Rep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub exclude_zero: bool,
    #[serde(default)]
    pub split_by: SplitBy,
    #[serde(default)]
    pub add_axis_b: bool,
    #[serde(default)]
    pub add_axis_c: bool,
}

impl ExportOptions {
    /// Axes included in the export, base first, in precedence order
    pub fn axes(&self, mode: Axis) -> Vec<Axis> {
        let [base, b, c] = super::axis::axes_from_mode(mode);
        let mut axes = vec![base];
        if self.add_axis_b {
            axes.push(b);
        }
        if self.add_axis_c {
            axes.push(c);
        }
        axes
    }
}

/// Summary-shaped query plus export options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub query: SummaryQuery,
    #[serde(default)]
    pub options: ExportOptions,
}

/// Body of the daily-series endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeriesRequest {
    pub period: Period,
    pub entity: super::metric::EntityRef,
}
