//! Tab-delimited result file parsing.
//!
//! Result files are written by the automation tool as ISO-8859-1 text (a
//! compatibility constraint with that tool): one header line, then one row
//! per measurement with a day-first date in column 0 and numeric channels in
//! columns 1..N. The configured decimal mark is either `.` or `,`.
//!
//! A strict parse is attempted first. When it fails because data rows carry
//! more columns than the first line (a crashed producer can truncate the
//! header or append partial rows), the parse is retried restricted to the
//! first line's literal column count. Any other failure means "no result"
//! for the template, never an error across the boundary.

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;

use qctrend_model::{ResultRow, ResultTable, TimestampCell};

/// Day-first timestamp formats accepted in the date column.
const DATETIME_FORMATS: [&str; 6] = [
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parse raw result-file bytes into a dated numeric table.
///
/// Returns `None` for anything that should read as "no result": empty or
/// unreadable content, no channels, fewer than two data rows (a single row
/// cannot establish a trend), or an unrecoverable column-count mismatch.
///
/// On success the table's rows are ordered ascending by timestamp, rows with
/// an empty timestamp cell or with every channel absent are dropped, and
/// unparseable timestamp cells are kept as raw text.
pub fn parse_result_table(bytes: &[u8], decimal_mark: char) -> Option<ResultTable> {
    let text = encoding_rs::mem::decode_latin1(bytes);
    let records = read_records(&text)?;
    if records.len() < 2 {
        tracing::debug!(rows = records.len(), "result file has no data rows");
        return None;
    }
    let header = &records[0];
    let width = header.len();
    if width < 2 {
        tracing::debug!(columns = width, "result file has no channel columns");
        return None;
    }

    let table = match build_table(header, &records[1..], decimal_mark, false) {
        Some(table) => table,
        None => {
            // Retry restricted to the first line's literal column count.
            tracing::debug!(
                columns = width,
                "inconsistent column counts, retrying with first-line column count"
            );
            build_table(header, &records[1..], decimal_mark, true)?
        }
    };

    if table.len() < 2 {
        tracing::debug!(rows = table.len(), "fewer than two usable data rows");
        return None;
    }
    Some(table)
}

fn read_records(text: &str) -> Option<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(%error, "failed to read result file record");
                return None;
            }
        };
        let row: Vec<String> = record.iter().map(|field| field.trim().to_string()).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        records.push(row);
    }
    if records.is_empty() {
        tracing::debug!("result file is empty");
        return None;
    }
    Some(records)
}

/// Assemble a table from pre-split records.
///
/// In the strict pass (`truncate_long_rows == false`) a record wider than
/// the header aborts the build; short records are padded with absent values
/// either way.
fn build_table(
    header: &[String],
    records: &[Vec<String>],
    decimal_mark: char,
    truncate_long_rows: bool,
) -> Option<ResultTable> {
    let width = header.len();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        if record.len() > width && !truncate_long_rows {
            return None;
        }
        let timestamp_raw = record.first().map(String::as_str).unwrap_or("");
        if timestamp_raw.is_empty() {
            continue;
        }
        let values: Vec<Option<f64>> = (1..width)
            .map(|index| {
                record
                    .get(index)
                    .and_then(|cell| parse_value(cell, decimal_mark))
            })
            .collect();
        if values.iter().all(Option::is_none) {
            continue;
        }
        rows.push(ResultRow {
            timestamp: parse_timestamp(timestamp_raw),
            values,
        });
    }

    let mut table = ResultTable {
        date_header: header[0].clone(),
        channels: header[1..].to_vec(),
        rows,
    };
    table.sort_by_timestamp();
    Some(table)
}

fn parse_timestamp(raw: &str) -> TimestampCell {
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return TimestampCell::Parsed(ts);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            if let Some(ts) = date.and_hms_opt(0, 0, 0) {
                return TimestampCell::Parsed(ts);
            }
        }
    }
    TimestampCell::Raw(raw.to_string())
}

fn parse_value(cell: &str, decimal_mark: char) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if decimal_mark == ',' {
        trimmed.replace(',', ".").parse().ok()
    } else {
        trimmed.parse().ok()
    }
}
