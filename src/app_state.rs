//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::GameService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Game service for all business logic.
    pub game_service: Arc<GameService>,
    /// Page size used when a listing request does not name one.
    pub history_page_size: u32,
    /// Days covered by the results chart.
    pub chart_window_days: u32,
}
