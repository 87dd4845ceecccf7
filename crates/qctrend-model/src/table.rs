//! Ordered, dated numeric tables parsed from automation result files.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

/// First-column cell of a result row.
///
/// The producing tool writes day-first dates, but a crashed run can leave a
/// trailing non-date value in the timestamp column. Such cells are kept as
/// raw text so the freshness calculation can surface them as an error state
/// instead of silently dropping the row.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampCell {
    /// A successfully parsed day-first timestamp.
    Parsed(NaiveDateTime),
    /// The raw cell text when parsing failed.
    Raw(String),
}

impl TimestampCell {
    /// The parsed timestamp, if any.
    pub fn as_parsed(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Parsed(ts) => Some(*ts),
            Self::Raw(_) => None,
        }
    }
}

/// One dated measurement row: a timestamp plus one value slot per channel.
///
/// `values[i]` corresponds to `ResultTable::channels[i]`; `None` marks an
/// absent or non-numeric cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub timestamp: TimestampCell,
    pub values: Vec<Option<f64>>,
}

/// An ordered sequence of dated numeric rows for one template.
///
/// Channels are the source file's columns 1..N and are fixed for a given
/// template. After loading, rows are ordered ascending by timestamp with
/// unparseable timestamps kept after all parsed ones (preserving their
/// relative order).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    /// Header of the timestamp column (column 0 of the source file).
    pub date_header: String,
    /// Channel names (headers of columns 1..N).
    pub channels: Vec<String>,
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index of a channel by name.
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|channel| channel == name)
    }

    /// All `(timestamp, value)` points for a channel, skipping rows with an
    /// unparseable timestamp or an absent value.
    pub fn channel_points(&self, name: &str) -> Vec<(NaiveDateTime, f64)> {
        let Some(index) = self.channel_index(name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| {
                let ts = row.timestamp.as_parsed()?;
                let value = row.values.get(index).copied().flatten()?;
                Some((ts, value))
            })
            .collect()
    }

    /// Non-absent values for a channel in row order, regardless of whether
    /// the row's timestamp parsed.
    pub fn channel_values(&self, name: &str) -> Vec<f64> {
        let Some(index) = self.channel_index(name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.values.get(index).copied().flatten())
            .collect()
    }

    /// Sort rows ascending by timestamp.
    ///
    /// Rows with unparseable timestamps sort after all parsed rows and keep
    /// their relative order, so trailing garbage stays the last row.
    pub fn sort_by_timestamp(&mut self) {
        self.rows.sort_by(|a, b| {
            match (a.timestamp.as_parsed(), b.timestamp.as_parsed()) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }
}
