//! Player DTOs for registration, profile, and balance adjustments.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::report_dto::TransactionDto;
use crate::domain::{Player, PlayerStats, TransactionType};

/// Request body for `POST /players`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterPlayerRequest {
    /// Desired username (3-150 characters: letters, digits, `@.+-_`).
    pub username: String,
}

/// Player state returned by registration and adjustments.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerResponse {
    /// Player identifier.
    pub player_id: Uuid,
    /// Unique username.
    pub username: String,
    /// Current balance.
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
    /// Paying plays.
    pub wins: u32,
    /// Non-paying plays.
    pub losses: u32,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Time of the latest play.
    pub last_activity: DateTime<Utc>,
}

impl From<Player> for PlayerResponse {
    fn from(player: Player) -> Self {
        Self {
            player_id: player.id.into(),
            username: player.username,
            balance: player.balance,
            wins: player.wins,
            losses: player.losses,
            created_at: player.created_at,
            last_activity: player.last_activity,
        }
    }
}

/// Response body for `GET /players/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerProfileResponse {
    /// Current player state.
    pub player: PlayerResponse,
    /// Number of plays.
    pub total_games: u64,
    /// Plays with result `WIN`.
    pub total_wins: u64,
    /// Plays with result `JACKPOT`.
    pub jackpots: u64,
    /// Percentage of plays with result `WIN`, two decimals.
    pub win_rate: f64,
    /// Sum of all payouts.
    #[schema(value_type = String, example = "112.50")]
    pub total_won: Decimal,
}

impl PlayerProfileResponse {
    /// Combines the player state with its statistics.
    #[must_use]
    pub fn new(player: Player, stats: PlayerStats) -> Self {
        Self {
            player: player.into(),
            total_games: stats.total_games,
            total_wins: stats.wins,
            jackpots: stats.jackpots,
            win_rate: (stats.win_rate * 100.0).round() / 100.0,
            total_won: stats.total_won,
        }
    }
}

/// Request body for `POST /players/{id}/adjustments`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustmentRequest {
    /// `DEPOSIT`, `WITHDRAWAL` or `BONUS`.
    pub transaction_type: TransactionType,
    /// Positive amount; rounded half-up to two decimals.
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,
}

/// Response body for `POST /players/{id}/adjustments` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct AdjustmentResponse {
    /// Player state after the adjustment.
    pub player: PlayerResponse,
    /// The posted ledger entry.
    pub transaction: TransactionDto,
}
