pub mod query_router;
pub mod sheet;
pub mod workspace;
