//! Play handler.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::PlayResponse;
use crate::app_state::AppState;
use crate::domain::PlayerId;
use crate::error::{ErrorResponse, GameError};

/// `POST /players/:id/play`: Play one round at the fixed minimum bet.
///
/// # Errors
///
/// Returns [`GameError::InsufficientFunds`] when the balance is below the
/// bet and [`GameError::PersistenceFailure`] when the play cannot be stored.
/// In both cases nothing is recorded.
#[utoipa::path(
    post,
    path = "/api/v1/players/{id}/play",
    tag = "Game",
    summary = "Play one round",
    description = "Debits the minimum bet, draws five symbols, classifies them against the paytable, and credits any payout. Balance, session, and ledger entries change together or not at all.",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
    ),
    responses(
        (status = 200, description = "Play settled", body = PlayResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 422, description = "Insufficient funds", body = ErrorResponse),
        (status = 500, description = "Play could not be stored", body = ErrorResponse),
    )
)]
pub async fn play(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, GameError> {
    let receipt = state.game_service.play(PlayerId::from_uuid(id)).await?;
    Ok(Json(PlayResponse::from(receipt)))
}

/// Game routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/players/{id}/play", post(play))
}
