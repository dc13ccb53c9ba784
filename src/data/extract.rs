use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ParseError};
use super::model::SweepPoint;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Window used when a file carries no `BEGIN` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Rows before the first data row (the header is the last skipped row).
    pub skip_rows: usize,
    /// Maximum number of data rows read.
    pub max_rows: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            skip_rows: 6,
            max_rows: 1001,
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rows == 0 {
            return Err(ConfigError::InvalidMaxRows);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Column matching
// ---------------------------------------------------------------------------

const FREQUENCY_KEYS: &[&str] = &["freq", "hz"];
const S11_KEYS: &[&str] = &["s11", "db(s(1,1))"];
const S21_KEYS: &[&str] = &["s21", "db(s(2,1))"];

/// Physical column indices of the three logical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub frequency: usize,
    pub s11: usize,
    pub s21: usize,
}

impl ColumnMap {
    /// Pick, per logical column, the first header cell (left to right)
    /// containing one of its keys.
    pub fn from_header(header: &[String]) -> Result<Self, ParseError> {
        let lowered: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |keys: &[&str]| {
            lowered
                .iter()
                .position(|h| keys.iter().any(|k| h.contains(k)))
        };

        match (find(FREQUENCY_KEYS), find(S11_KEYS), find(S21_KEYS)) {
            (Some(frequency), Some(s11), Some(s21)) => Ok(Self {
                frequency,
                s11,
                s21,
            }),
            (f, a, b) => Err(ParseError::MissingColumns {
                frequency: f.is_some(),
                s11: a.is_some(),
                s21: b.is_some(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Data window
// ---------------------------------------------------------------------------

/// Half-open range `[start, end)` of data rows inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataWindow {
    pub start: usize,
    pub end: usize,
}

impl DataWindow {
    /// Index of the header row, if `start` leaves room for one.
    pub fn header_index(&self) -> Option<usize> {
        self.start.checked_sub(1)
    }
}

fn first_cell(row: &[String]) -> String {
    row.first().map(|c| c.trim().to_uppercase()).unwrap_or_default()
}

/// Locate the data rows, preferring `BEGIN`/`END` markers over `config`.
pub fn locate_window(rows: &[Vec<String>], config: &ExtractConfig) -> DataWindow {
    let mut begin: Option<usize> = None;
    let mut end: Option<usize> = None;
    let mut header: Option<usize> = None;

    for (i, row) in rows.iter().enumerate() {
        let cell = first_cell(row);
        if cell == "BEGIN" && begin.is_none() {
            begin = Some(i);
            continue;
        }
        if cell == "END" {
            end = Some(i);
            break;
        }
        if begin.is_some() && header.is_none() {
            let lower = cell.to_lowercase();
            if lower.contains("freq") || lower.contains("hz") {
                header = Some(i);
            }
        }
    }

    let (start, stop) = match begin {
        Some(b) => {
            let start = header.map_or(b + 1, |h| h + 1);
            (start, end.unwrap_or(start.saturating_add(config.max_rows)))
        }
        None => (
            config.skip_rows,
            config.skip_rows.saturating_add(config.max_rows),
        ),
    };

    DataWindow {
        start,
        end: stop.min(rows.len()),
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

fn parse_cell(row: &[String], idx: usize) -> Option<f64> {
    row.get(idx)
        .and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Turn the rows of one file into validated sweep points.
///
/// Rows whose frequency is missing, non-numeric or not strictly positive are
/// dropped, as are rows whose S11/S21 cells do not hold a finite number.
pub fn extract(rows: &[Vec<String>], config: &ExtractConfig) -> Result<Vec<SweepPoint>, ParseError> {
    let window = locate_window(rows, config);
    let header: &[String] = window
        .header_index()
        .and_then(|i| rows.get(i))
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let columns = ColumnMap::from_header(header)?;

    log::debug!(
        "data window {}..{} of {} rows, columns {:?}",
        window.start,
        window.end,
        rows.len(),
        columns
    );

    let points: Vec<SweepPoint> = rows
        .get(window.start..window.end)
        .unwrap_or(&[])
        .iter()
        .filter_map(|row| {
            let frequency_hz = parse_cell(row, columns.frequency).filter(|f| *f > 0.0)?;
            Some(SweepPoint {
                frequency_hz,
                s11_db: parse_cell(row, columns.s11)?,
                s21_db: parse_cell(row, columns.s21)?,
            })
        })
        .collect();

    if points.is_empty() {
        return Err(ParseError::EmptyResult);
    }
    Ok(points)
}
