use super::types::{ColumnProfile, ColumnStatistic, DataPreview, Grid, TableSummary};
use super::utils::round2;

/// Shape and completeness of the grid. Zero records give 0% completeness.
pub fn summarize(grid: &Grid, profiles: &[ColumnProfile]) -> TableSummary {
    let total_rows = grid.records.len();
    let non_empty_rows = grid.non_empty_records();
    let completeness = if total_rows == 0 {
        0
    } else {
        (non_empty_rows as f64 / total_rows as f64 * 100.0).round() as u32
    };

    TableSummary {
        total_rows,
        total_columns: grid.headers.len(),
        numeric_column_count: profiles.len(),
        non_empty_rows,
        completeness,
    }
}

/// Per-column statistics table, two decimals.
pub fn column_statistics(profiles: &[ColumnProfile]) -> Vec<ColumnStatistic> {
    profiles
        .iter()
        .map(|profile| ColumnStatistic {
            name: profile.name.clone(),
            average: round2(profile.avg),
            minimum: round2(profile.min),
            maximum: round2(profile.max),
            range: round2(profile.range()),
        })
        .collect()
}

/// First `limit` records rendered as strings against the header width.
pub fn preview(grid: &Grid, limit: usize) -> DataPreview {
    let headers: Vec<String> = grid
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            if header.is_empty() {
                format!("Column {}", i + 1)
            } else {
                header.clone()
            }
        })
        .collect();

    let rows = (0..grid.records.len().min(limit))
        .map(|row| {
            (0..headers.len())
                .map(|col| grid.cell(row, col).to_string())
                .collect()
        })
        .collect();

    DataPreview {
        headers,
        rows,
        total_rows: grid.records.len(),
        truncated: grid.records.len() > limit,
    }
}
