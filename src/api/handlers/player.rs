//! Player handlers: register, profile, balance adjustments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{
    AdjustmentRequest, AdjustmentResponse, PlayerProfileResponse, PlayerResponse,
    RegisterPlayerRequest,
};
use crate::app_state::AppState;
use crate::domain::PlayerId;
use crate::error::{ErrorResponse, GameError};

/// `POST /players`: Register a new player.
///
/// # Errors
///
/// Returns [`GameError::InvalidRequest`] for a malformed username and
/// [`GameError::UsernameTaken`] when it is already registered.
#[utoipa::path(
    post,
    path = "/api/v1/players",
    tag = "Players",
    summary = "Register a player",
    description = "Creates a player account credited with the configured seed balance.",
    request_body = RegisterPlayerRequest,
    responses(
        (status = 201, description = "Player registered", body = PlayerResponse),
        (status = 400, description = "Invalid username", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
    )
)]
pub async fn register_player(
    State(state): State<AppState>,
    Json(req): Json<RegisterPlayerRequest>,
) -> Result<impl IntoResponse, GameError> {
    let player = state.game_service.register_player(&req.username).await?;
    Ok((StatusCode::CREATED, Json(PlayerResponse::from(player))))
}

/// `GET /players/:id`: Player profile with statistics.
///
/// # Errors
///
/// Returns [`GameError::PlayerNotFound`] if the player does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/players/{id}",
    tag = "Players",
    summary = "Get player profile",
    description = "Returns balance, win/loss counters, and aggregated play statistics.",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
    ),
    responses(
        (status = 200, description = "Player profile", body = PlayerProfileResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
    )
)]
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, GameError> {
    let player_id = PlayerId::from_uuid(id);
    let player = state.game_service.player(player_id).await?;
    let stats = state.game_service.stats(player_id).await?;
    Ok(Json(PlayerProfileResponse::new(player, stats)))
}

/// `POST /players/:id/adjustments`: Post a DEPOSIT, WITHDRAWAL or BONUS.
///
/// # Errors
///
/// Returns [`GameError::InvalidRequest`] for BET/WIN types,
/// [`GameError::InvalidAmount`] for a non-positive amount, and
/// [`GameError::InsufficientFunds`] for an overdrawing withdrawal.
#[utoipa::path(
    post,
    path = "/api/v1/players/{id}/adjustments",
    tag = "Players",
    summary = "Adjust player balance",
    description = "Posts an operator ledger entry. BET and WIN entries are produced by plays only.",
    params(
        ("id" = Uuid, Path, description = "Player UUID"),
    ),
    request_body = AdjustmentRequest,
    responses(
        (status = 201, description = "Entry posted", body = AdjustmentResponse),
        (status = 400, description = "Invalid type or amount", body = ErrorResponse),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 422, description = "Insufficient funds", body = ErrorResponse),
    )
)]
pub async fn adjust_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AdjustmentRequest>,
) -> Result<impl IntoResponse, GameError> {
    let (player, transaction) = state
        .game_service
        .adjust_balance(PlayerId::from_uuid(id), req.transaction_type, req.amount)
        .await?;
    let response = AdjustmentResponse {
        player: player.into(),
        transaction: transaction.into(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Player management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/players", post(register_player))
        .route("/players/{id}", get(get_player))
        .route("/players/{id}/adjustments", post(adjust_balance))
}
