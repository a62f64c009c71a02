//! Reporting DTOs: game history, ledger, last outcome, and chart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common_dto::PaginationMeta;
use crate::domain::{DailyResults, GameResult, GameSession, Transaction, TransactionType, WinTier};

/// One game session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    /// Session identifier.
    pub session_id: Uuid,
    /// Stake of the play.
    #[schema(value_type = String, example = "5.00")]
    pub bet_amount: Decimal,
    /// Matched paytable tier.
    pub tier: WinTier,
    /// `LOSS`, `WIN` or `JACKPOT`.
    pub result: GameResult,
    /// Payout; `0.00` on a loss.
    #[schema(value_type = String, example = "12.50")]
    pub win_amount: Decimal,
    /// The five drawn symbols.
    pub numbers: Vec<u8>,
    /// Play timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<GameSession> for SessionDto {
    fn from(session: GameSession) -> Self {
        Self {
            session_id: session.id.into(),
            bet_amount: session.bet_amount,
            tier: session.tier,
            result: session.result,
            win_amount: session.win_amount,
            numbers: session.outcome.symbols().to_vec(),
            created_at: session.created_at,
        }
    }
}

/// One ledger entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionDto {
    /// Entry identifier.
    pub transaction_id: Uuid,
    /// Position in the player's ledger, starting at 1.
    pub sequence: u64,
    /// Signed amount: negative for debits.
    #[schema(value_type = String, example = "-5.00")]
    pub amount: Decimal,
    /// Entry type.
    pub transaction_type: TransactionType,
    /// Session that produced the entry, for BET and WIN.
    pub game_session_id: Option<Uuid>,
    /// Balance after the entry was applied.
    #[schema(value_type = String, example = "995.00")]
    pub balance_after: Decimal,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionDto {
    fn from(entry: Transaction) -> Self {
        Self {
            transaction_id: entry.id.into(),
            sequence: entry.sequence,
            amount: entry.amount,
            transaction_type: entry.kind,
            game_session_id: entry.session_id.map(Into::into),
            balance_after: entry.balance_after,
            created_at: entry.created_at,
        }
    }
}

/// Paginated response for `GET /players/{id}/sessions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionListResponse {
    /// Sessions, newest first.
    pub data: Vec<SessionDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Paginated response for `GET /players/{id}/transactions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    /// Ledger entries, newest first.
    pub data: Vec<TransactionDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /players/{id}/last-outcome`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LastOutcomeResponse {
    /// Symbols of the latest play, or `[7,7,7,7,7]` before the first one.
    pub numbers: Vec<u8>,
}

/// Response body for `GET /players/{id}/chart`.
///
/// The four arrays are parallel; one element per day that had plays.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ChartResponse {
    /// Window length in days.
    pub days: u32,
    /// Day labels formatted `dd.mm`.
    pub labels: Vec<String>,
    /// `WIN` counts.
    pub wins: Vec<u32>,
    /// `LOSS` counts.
    pub losses: Vec<u32>,
    /// `JACKPOT` counts.
    pub jackpots: Vec<u32>,
}

impl ChartResponse {
    /// Builds the chart series from per-day counts.
    #[must_use]
    pub fn new(days: u32, daily: &[DailyResults]) -> Self {
        let mut chart = Self {
            days,
            ..Self::default()
        };
        for day in daily {
            chart.labels.push(day.date.format("%d.%m").to_string());
            chart.wins.push(day.wins);
            chart.losses.push(day.losses);
            chart.jackpots.push(day.jackpots);
        }
        chart
    }
}
