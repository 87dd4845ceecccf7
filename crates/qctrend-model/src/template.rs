//! Per-template aggregation records.

use std::fmt;

use chrono::NaiveDate;

use crate::limits::LimitPlotTemplate;
use crate::table::ResultTable;

/// Sentinel for `days_since` when the newest result date is undeterminable.
///
/// A large negative value keeps "undetermined" clearly apart from "zero days
/// old" in the overview table.
pub const DAYS_SINCE_UNKNOWN: i64 = -1000;

/// Derived template health, shown in the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateStatus {
    #[default]
    Ok,
    Failed,
    Watch,
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
            Self::Watch => "watch",
        };
        f.write_str(text)
    }
}

/// Date of the newest result row, or an error state when the trailing
/// timestamp cell did not parse as a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewestDate {
    Date(NaiveDate),
    Error,
}

impl fmt::Display for NewestDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One monitored measurement stream for one modality.
///
/// Constructed once per aggregation pass and immutable thereafter; the next
/// pass rebuilds every template from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Display name, unique per modality.
    pub label: String,
    /// Parsed results, absent when no valid result file was found.
    pub data: Option<ResultTable>,
    /// Resolved limit/plot template (possibly the synthesized default).
    pub limits_and_plot: LimitPlotTemplate,
    pub newest_date: NewestDate,
    /// Whole days between "today" and `newest_date`; [`DAYS_SINCE_UNKNOWN`]
    /// when undeterminable.
    pub days_since: i64,
    pub status: TemplateStatus,
}
