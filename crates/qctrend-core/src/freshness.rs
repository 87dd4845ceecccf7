//! Freshness: newest result date and elapsed days.

use chrono::NaiveDate;

use qctrend_model::{DAYS_SINCE_UNKNOWN, NewestDate, ResultTable, TimestampCell};

/// Newest-sample date and days elapsed since, for one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    pub newest_date: NewestDate,
    pub days_since: i64,
}

/// Compute freshness from an ascending result table.
///
/// The table's last row carries the newest timestamp. When that cell did not
/// parse as a date (the parser admits malformed trailing rows on purpose),
/// the result is the explicit error state with the [`DAYS_SINCE_UNKNOWN`]
/// sentinel, which keeps "undetermined" apart from "zero days old".
pub fn freshness(table: &ResultTable, today: NaiveDate) -> Freshness {
    let newest = table.rows.last().map(|row| &row.timestamp);
    match newest {
        Some(TimestampCell::Parsed(ts)) => {
            let date = ts.date();
            Freshness {
                newest_date: NewestDate::Date(date),
                days_since: (today - date).num_days(),
            }
        }
        Some(TimestampCell::Raw(_)) | None => Freshness {
            newest_date: NewestDate::Error,
            days_since: DAYS_SINCE_UNKNOWN,
        },
    }
}
