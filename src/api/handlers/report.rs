//! Reporting handlers: game history, ledger, last outcome, results chart.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    ChartResponse, LastOutcomeResponse, PaginationMeta, PaginationParams, SessionListResponse,
    TransactionListResponse,
};
use crate::app_state::AppState;
use crate::domain::PlayerId;
use crate::error::{ErrorResponse, GameError};

/// `GET /players/:id/sessions`: Paginated game history, newest first.
///
/// # Errors
///
/// Returns [`GameError::PlayerNotFound`] if the player does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/players/{id}/sessions",
    tag = "Reports",
    summary = "List game sessions",
    description = "Returns the player's plays, newest first. `per_page` defaults to the configured history page size.",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Paginated sessions", body = SessionListResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GameError> {
    let (page, per_page) = params.resolve(state.history_page_size);
    let sessions = state
        .game_service
        .sessions(PlayerId::from_uuid(id), page, per_page)
        .await?;
    let pagination = PaginationMeta::from(&sessions);
    Ok(Json(SessionListResponse {
        data: sessions.items.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

/// `GET /players/:id/transactions`: Paginated ledger, newest first.
///
/// # Errors
///
/// Returns [`GameError::PlayerNotFound`] if the player does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/players/{id}/transactions",
    tag = "Reports",
    summary = "List ledger entries",
    description = "Returns the player's ledger entries, newest first.",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
        PaginationParams,
    ),
    responses(
        (status = 200, description = "Paginated ledger", body = TransactionListResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GameError> {
    let (page, per_page) = params.resolve(state.history_page_size);
    let entries = state
        .game_service
        .transactions(PlayerId::from_uuid(id), page, per_page)
        .await?;
    let pagination = PaginationMeta::from(&entries);
    Ok(Json(TransactionListResponse {
        data: entries.items.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

/// `GET /players/:id/last-outcome`: Symbols of the latest play.
///
/// # Errors
///
/// Returns [`GameError::PlayerNotFound`] if the player does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/players/{id}/last-outcome",
    tag = "Reports",
    summary = "Get last outcome",
    description = "Returns the five symbols of the latest play, or `[7,7,7,7,7]` before the first play.",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
    ),
    responses(
        (status = 200, description = "Last outcome", body = LastOutcomeResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
    )
)]
pub async fn last_outcome(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, GameError> {
    let outcome = state
        .game_service
        .last_outcome(PlayerId::from_uuid(id))
        .await?;
    Ok(Json(LastOutcomeResponse {
        numbers: outcome.symbols().to_vec(),
    }))
}

/// `GET /players/:id/chart`: Per-day result counts.
///
/// # Errors
///
/// Returns [`GameError::PlayerNotFound`] if the player does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/players/{id}/chart",
    tag = "Reports",
    summary = "Get results chart",
    description = "Returns win, loss, and jackpot counts per day over the configured window. Days without plays are omitted.",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
    ),
    responses(
        (status = 200, description = "Chart series", body = ChartResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
    )
)]
pub async fn chart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, GameError> {
    let days = state.chart_window_days;
    let daily = state
        .game_service
        .daily_results(PlayerId::from_uuid(id), days)
        .await?;
    Ok(Json(ChartResponse::new(days, &daily)))
}

/// Reporting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/players/{id}/sessions", get(list_sessions))
        .route("/players/{id}/transactions", get(list_transactions))
        .route("/players/{id}/last-outcome", get(last_outcome))
        .route("/players/{id}/chart", get(chart))
}
