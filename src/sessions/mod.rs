pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod sport;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::session_routes()
}
