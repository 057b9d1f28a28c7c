use super::types::{ColumnProfile, Grid};
use super::utils::parse_numeric;

/// Profile every header position that holds at least one numeric value.
///
/// Output follows header order; text-only columns leave a gap. Blank and
/// duplicate header names are kept as they are.
pub fn profile_columns(grid: &Grid) -> Vec<ColumnProfile> {
    let start = std::time::Instant::now();

    let profiles: Vec<ColumnProfile> = grid
        .headers
        .iter()
        .enumerate()
        .filter_map(|(index, name)| profile_column(grid, index, name))
        .collect();

    tracing::debug!(
        "Profiled {} of {} columns across {} records in {:?}",
        profiles.len(),
        grid.headers.len(),
        grid.records.len(),
        start.elapsed()
    );
    profiles
}

fn profile_column(grid: &Grid, index: usize, name: &str) -> Option<ColumnProfile> {
    let values: Vec<f64> = (0..grid.records.len())
        .filter_map(|row| parse_numeric(grid.cell(row, index)))
        .collect();

    let first = *values.first()?;
    let (mut sum, mut min, mut max) = (0.0, first, first);
    for &value in &values {
        sum += value;
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }
    let count = values.len();
    let avg = mean(&values, sum).clamp(min, max);
    // An overflowing total saturates at the largest finite value.
    let sum = if sum.is_finite() {
        sum
    } else {
        (avg * count as f64).clamp(f64::MIN, f64::MAX)
    };

    Some(ColumnProfile {
        name: name.to_string(),
        index,
        count,
        avg,
        min,
        max,
        sum,
        values,
    })
}

/// `sum / n`, or the mean of pre-scaled values when the running sum overflowed.
fn mean(values: &[f64], sum: f64) -> f64 {
    let n = values.len() as f64;
    if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum()
    }
}
