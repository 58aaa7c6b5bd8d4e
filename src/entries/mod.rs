pub mod dto;
pub mod export;
pub mod handlers;
pub mod kind;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use kind::EntryKind;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::entry_routes(EntryKind::Income))
        .merge(handlers::entry_routes(EntryKind::Expense))
}
