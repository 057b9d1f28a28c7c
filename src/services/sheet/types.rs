use serde::{Deserialize, Serialize};
use std::fmt;

pub const ROW_SERIES_LIMIT: usize = 10;
pub const AVERAGE_SERIES_LIMIT: usize = 5;
pub const PALETTE_SIZE: usize = 5;
pub const DEFAULT_PREVIEW_ROWS: usize = 100;

/// A single untyped cell as produced by the spreadsheet parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Empty cells and empty strings. Whitespace-only text is content.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Raw parsed table: row 0 becomes `headers`, the rest are `records`.
///
/// Records are read positionally against the headers. A short record is
/// padded with empty cells on read, extra cells are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grid {
    pub headers: Vec<String>,
    pub records: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let records = rows.split_off(1);
        let headers = rows
            .pop()
            .unwrap_or_default()
            .iter()
            .map(|cell| cell.to_string())
            .collect();

        Self { headers, records }
    }

    /// Convenience constructor used by callers holding plain strings.
    pub fn from_strings<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|s| Cell::from(s.as_ref())).collect())
                .collect(),
        )
    }

    /// True when there is no data row to analyze.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cell(&self, record: usize, column: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.records
            .get(record)
            .and_then(|row| row.get(column))
            .unwrap_or(EMPTY)
    }

    /// Records with at least one non-blank cell.
    pub fn non_empty_records(&self) -> usize {
        self.records
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_blank()))
            .count()
    }
}

/// Numeric statistics for one column, built only from coercible cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub index: usize,
    pub values: Vec<f64>,
    pub count: usize,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

impl ColumnProfile {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// `range / avg`. A zero average yields 0 for a flat column and
    /// infinity otherwise, so ranking never sees NaN.
    pub fn variability(&self) -> f64 {
        let range = self.range();
        if self.avg == 0.0 {
            if range == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            range / self.avg
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub numeric_column_count: usize,
    pub non_empty_rows: usize,
    /// Percentage in `0..=100`.
    pub completeness: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_slot: Option<usize>,
}

pub type ChartSeries = Vec<ChartPoint>;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartProjection {
    pub row_series: ChartSeries,
    pub column_average_series: ChartSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistic {
    pub name: String,
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub truncated: bool,
}

/// Every derived entity for one grid, recomputed together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub profiles: Vec<ColumnProfile>,
    pub summary: TableSummary,
    pub charts: ChartProjection,
    pub statistics: Vec<ColumnStatistic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_splits_headers_from_records() {
        let grid = Grid::from_strings(&[vec!["Name", "Score"], vec!["A", "10"]]);
        assert_eq!(grid.headers, vec!["Name", "Score"]);
        assert_eq!(grid.records.len(), 1);
        assert!(!grid.is_empty());
    }

    #[test]
    fn headers_only_grid_is_empty() {
        let grid = Grid::from_strings(&[vec!["Name"]]);
        assert!(grid.is_empty());
        assert!(Grid::from_rows(Vec::new()).is_empty());
    }

    #[test]
    fn short_records_read_as_empty() {
        let grid = Grid::from_strings(&[vec!["a", "b", "c"], vec!["1"]]);
        assert_eq!(grid.cell(0, 2), &Cell::Empty);
        assert_eq!(grid.cell(5, 0), &Cell::Empty);
    }

    #[test]
    fn number_cells_display_without_trailing_fraction() {
        assert_eq!(Cell::Number(3.0).to_string(), "3");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Bool(true).to_string(), "true");
    }

    #[test]
    fn zero_average_variability_stays_numeric() {
        let profile = ColumnProfile {
            name: "x".into(),
            index: 0,
            values: vec![-1.0, 1.0],
            count: 2,
            avg: 0.0,
            min: -1.0,
            max: 1.0,
            sum: 0.0,
        };
        assert!(profile.variability().is_infinite());
        assert!(!profile.variability().is_nan());
    }
}
