//! Pivot axes and their fixed precedence

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three interchangeable grouping dimensions
///
/// `Ord` follows declaration order and is only used for map keys; the
/// display order of axes is always [`axes_from_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Customer,
    Item,
    Date,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Customer, Axis::Item, Axis::Date];

    /// Wire identifier (`customer`, `item`, `date`)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Axis::Customer => "customer",
            Axis::Item => "item",
            Axis::Date => "date",
        }
    }

    /// Human-readable tab label
    pub const fn label(&self) -> &'static str {
        match self {
            Axis::Customer => "Customer",
            Axis::Item => "Item",
            Axis::Date => "Date",
        }
    }

    /// The two non-base axes in precedence order
    pub fn targets(self) -> [Axis; 2] {
        let [_, b, c] = axes_from_mode(self);
        [b, c]
    }
}

/// Fixed axis precedence for a base mode; the base axis always comes first
///
/// ```
/// use shared::models::{axes_from_mode, Axis};
///
/// assert_eq!(
///     axes_from_mode(Axis::Item),
///     [Axis::Item, Axis::Customer, Axis::Date]
/// );
/// ```
pub const fn axes_from_mode(mode: Axis) -> [Axis; 3] {
    match mode {
        Axis::Customer => [Axis::Customer, Axis::Item, Axis::Date],
        Axis::Item => [Axis::Item, Axis::Customer, Axis::Date],
        Axis::Date => [Axis::Date, Axis::Customer, Axis::Item],
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Axis::Customer),
            "item" => Ok(Axis::Item),
            "date" => Ok(Axis::Date),
            other => Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                format!("Unknown axis: {}", other),
            )
            .with_detail("axis", other)),
        }
    }
}
