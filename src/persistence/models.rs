//! Database rows for players, sessions, and ledger entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    GameResult, GameSession, Outcome, Player, PlayerId, SessionId, Transaction, TransactionId,
    TransactionType, WinTier,
};
use crate::error::GameError;

/// A row from the `players` table.
pub type PlayerRow = (
    Uuid,
    String,
    Decimal,
    Decimal,
    i32,
    i32,
    DateTime<Utc>,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// A row from the `game_sessions` table.
pub type SessionRow = (
    Uuid,
    Uuid,
    Decimal,
    String,
    Decimal,
    serde_json::Value,
    DateTime<Utc>,
);

/// A row from the `transactions` table.
pub type TransactionRow = (
    Uuid,
    Uuid,
    i64,
    Decimal,
    String,
    Option<Uuid>,
    Decimal,
    DateTime<Utc>,
);

fn corrupt(table: &str, id: Uuid, what: impl std::fmt::Display) -> GameError {
    GameError::PersistenceFailure(format!("corrupt {table} row {id}: {what}"))
}

/// Converts a player row into the player and its opening balance.
///
/// # Errors
///
/// Returns [`GameError::PersistenceFailure`] if a counter is negative.
pub fn player_from_row(row: PlayerRow) -> Result<(Player, Decimal), GameError> {
    let (id, username, balance, opening_balance, wins, losses, created_at, updated_at, last_activity) =
        row;
    let wins = u32::try_from(wins).map_err(|e| corrupt("players", id, e))?;
    let losses = u32::try_from(losses).map_err(|e| corrupt("players", id, e))?;
    let player = Player {
        id: PlayerId::from_uuid(id),
        username,
        balance,
        wins,
        losses,
        created_at,
        updated_at,
        last_activity,
    };
    Ok((player, opening_balance))
}

/// Converts a session row. The tier is recomputed from the stored symbols.
///
/// # Errors
///
/// Returns [`GameError::PersistenceFailure`] on an unknown result string or
/// malformed symbols.
pub fn session_from_row(row: SessionRow) -> Result<GameSession, GameError> {
    let (id, player_id, bet_amount, result, win_amount, numbers, created_at) = row;
    let result = GameResult::parse(&result)
        .ok_or_else(|| corrupt("game_sessions", id, format!("unknown result {result:?}")))?;
    let symbols: Vec<u8> =
        serde_json::from_value(numbers).map_err(|e| corrupt("game_sessions", id, e))?;
    let outcome = Outcome::try_from_slice(&symbols).map_err(|e| corrupt("game_sessions", id, e))?;
    Ok(GameSession {
        id: SessionId::from_uuid(id),
        player_id: PlayerId::from_uuid(player_id),
        bet_amount,
        tier: WinTier::classify(&outcome),
        result,
        win_amount,
        outcome,
        created_at,
    })
}

/// Converts a ledger row.
///
/// # Errors
///
/// Returns [`GameError::PersistenceFailure`] on an unknown type string or a
/// negative sequence.
pub fn transaction_from_row(row: TransactionRow) -> Result<Transaction, GameError> {
    let (id, player_id, sequence, amount, kind, session_id, balance_after, created_at) = row;
    let kind = TransactionType::parse(&kind)
        .ok_or_else(|| corrupt("transactions", id, format!("unknown type {kind:?}")))?;
    let sequence = u64::try_from(sequence).map_err(|e| corrupt("transactions", id, e))?;
    Ok(Transaction {
        id: TransactionId::from_uuid(id),
        player_id: PlayerId::from_uuid(player_id),
        sequence,
        amount,
        kind,
        session_id: session_id.map(SessionId::from_uuid),
        balance_after,
        created_at,
    })
}
