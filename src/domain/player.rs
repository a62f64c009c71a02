//! Player account state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::PlayerId;
use super::money::round_currency;

/// A player's balance and play counters.
///
/// Only the ledger transitions in [`super::ledger`] produce a modified
/// `Player`; the balance is never negative after any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    /// Unique player identifier (immutable after creation).
    pub id: PlayerId,
    /// Login name resolved by the caller's identity layer.
    pub username: String,
    /// Current balance, two decimals.
    pub balance: Decimal,
    /// Number of plays that paid out.
    pub wins: u32,
    /// Number of plays that paid nothing.
    pub losses: u32,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last balance change.
    pub updated_at: DateTime<Utc>,
    /// Timestamp of the last play or adjustment.
    pub last_activity: DateTime<Utc>,
}

impl Player {
    /// Creates a player holding `seed_balance`.
    #[must_use]
    pub fn new(username: String, seed_balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: PlayerId::new(),
            username,
            balance: round_currency(seed_balance),
            wins: 0,
            losses: 0,
            created_at: now,
            updated_at: now,
            last_activity: now,
        }
    }

    /// Total number of plays recorded on the counters.
    #[must_use]
    pub const fn games_played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_player_starts_with_seed_and_zero_counters() {
        let player = Player::new("alice".to_string(), dec!(1000));
        assert_eq!(player.balance.to_string(), "1000.00");
        assert_eq!(player.games_played(), 0);
        assert_eq!(player.created_at, player.last_activity);
    }
}
