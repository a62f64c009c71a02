//! REST endpoint handlers organized by resource.

pub mod play;
pub mod player;
pub mod report;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(player::routes())
        .merge(play::routes())
        .merge(report::routes())
}
