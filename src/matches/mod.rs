use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod engine;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    handlers::match_routes()
}

/// The partition key for assignments. Read once at the top of a request and
/// threaded as an explicit parameter; never re-read mid-operation.
pub fn current_year() -> i64 {
    i64::from(time::OffsetDateTime::now_utc().year())
}
