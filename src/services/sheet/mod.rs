pub mod charts;
pub mod parser;
pub mod profiler;
pub mod summary;
pub mod types;
pub mod utils;

pub use charts::project_charts;
pub use parser::{parse_spreadsheet, FileFormat};
pub use profiler::profile_columns;
pub use summary::{column_statistics, preview, summarize};
pub use types::*;

/// Recompute every derived entity of a grid in one pass.
pub fn analyze(grid: &Grid) -> Analysis {
    let start = std::time::Instant::now();
    let profiles = profile_columns(grid);
    let summary = summarize(grid, &profiles);
    let charts = project_charts(grid, &profiles);
    let statistics = column_statistics(&profiles);
    tracing::info!(
        "Analysis completed in {:?}: {} rows, {} columns, {} numeric",
        start.elapsed(),
        summary.total_rows,
        summary.total_columns,
        summary.numeric_column_count
    );

    Analysis {
        profiles,
        summary,
        charts,
        statistics,
    }
}
