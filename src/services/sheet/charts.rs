use super::types::{
    ChartPoint, ChartProjection, ColumnProfile, Grid, AVERAGE_SERIES_LIMIT, PALETTE_SIZE,
    ROW_SERIES_LIMIT,
};
use super::utils::numeric_or_zero;

/// Build the bar (row) and pie (column average) series.
///
/// Row values that fail to coerce plot as 0 instead of being dropped, unlike
/// the profiler.
pub fn project_charts(grid: &Grid, profiles: &[ColumnProfile]) -> ChartProjection {
    ChartProjection {
        row_series: row_series(grid, profiles),
        column_average_series: column_average_series(profiles),
    }
}

fn row_series(grid: &Grid, profiles: &[ColumnProfile]) -> Vec<ChartPoint> {
    let Some(first) = profiles.first() else {
        return Vec::new();
    };

    (0..grid.records.len().min(ROW_SERIES_LIMIT))
        .map(|row| {
            let label_cell = grid.cell(row, 0);
            let label = if label_cell.is_blank() {
                format!("Row {}", row + 1)
            } else {
                label_cell.to_string()
            };
            ChartPoint {
                label,
                value: numeric_or_zero(grid.cell(row, first.index)),
                color_slot: None,
            }
        })
        .collect()
}

fn column_average_series(profiles: &[ColumnProfile]) -> Vec<ChartPoint> {
    profiles
        .iter()
        .take(AVERAGE_SERIES_LIMIT)
        .enumerate()
        .map(|(i, profile)| ChartPoint {
            label: profile.name.clone(),
            value: profile.avg,
            color_slot: Some(i % PALETTE_SIZE),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sheet::profiler::profile_columns;

    fn wide_grid(records: usize) -> Grid {
        let mut rows = vec![vec![
            "Label".to_string(),
            "A".into(),
            "B".into(),
            "C".into(),
            "D".into(),
            "E".into(),
            "F".into(),
        ]];
        for i in 0..records {
            let mut row = vec![format!("r{}", i)];
            row.extend((1..=6).map(|c| (i * c).to_string()));
            rows.push(row);
        }
        Grid::from_strings(&rows)
    }

    #[test]
    fn row_series_is_capped_at_ten() {
        let grid = wide_grid(25);
        let charts = project_charts(&grid, &profile_columns(&grid));
        assert_eq!(charts.row_series.len(), 10);
        assert_eq!(charts.row_series[3].label, "r3");
        assert_eq!(charts.row_series[3].value, 3.0);
    }

    #[test]
    fn row_series_matches_short_tables() {
        let grid = wide_grid(4);
        let charts = project_charts(&grid, &profile_columns(&grid));
        assert_eq!(charts.row_series.len(), 4);
    }

    #[test]
    fn no_profiles_means_no_row_series() {
        let grid = Grid::from_strings(&[vec!["a"], vec!["x"], vec!["y"]]);
        let charts = project_charts(&grid, &profile_columns(&grid));
        assert!(charts.row_series.is_empty());
        assert!(charts.column_average_series.is_empty());
    }

    #[test]
    fn blank_labels_and_bad_values_fall_back() {
        let grid = Grid::from_strings(&[
            vec!["Name", "Score"],
            vec!["", "oops"],
            vec!["B", "7"],
        ]);
        let charts = project_charts(&grid, &profile_columns(&grid));

        assert_eq!(charts.row_series[0].label, "Row 1");
        assert_eq!(charts.row_series[0].value, 0.0);
        assert_eq!(charts.row_series[1].value, 7.0);
    }

    #[test]
    fn average_series_takes_five_columns_with_color_slots() {
        let grid = wide_grid(3);
        let charts = project_charts(&grid, &profile_columns(&grid));
        let series = &charts.column_average_series;

        assert_eq!(series.len(), 5);
        assert_eq!(series[0].label, "A");
        assert_eq!(series[4].label, "E");
        assert_eq!(series[4].color_slot, Some(4));
        assert_eq!(series[1].value, 2.0);
    }
}
