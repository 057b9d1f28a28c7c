use axum::Router;
use parking_lot::RwLock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use services::query_router::{answer_question, route_question, Intent};
pub use services::sheet::{
    analyze, parse_spreadsheet, profile_columns, project_charts, summarize, Analysis, Cell,
    ColumnProfile, Grid, TableSummary,
};
pub use services::workspace::{Dataset, Workspace};

// Application state
pub struct AppState {
    pub config: Config,
    pub workspace: RwLock<Workspace>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            workspace: RwLock::new(Workspace::new()),
        }
    }
}

/// Full router with every route and layer attached.
pub fn app(state: Arc<AppState>) -> Router {
    let max_file_size = state.config.max_file_size;
    Router::new()
        .merge(routes::routes())
        .merge(routes::sheets::routes(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
