//! Player account aggregate: a player plus its session and ledger history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::ledger::{Adjustment, GameSession, PlaySettlement, Transaction};
use super::outcome::Outcome;
use super::paytable::GameResult;
use super::player::Player;
use super::PlayerId;

/// Aggregate held in the [`super::PlayerRegistry`] for each player.
///
/// Sessions and transactions are kept in posting order (oldest first).
#[derive(Debug, Clone)]
pub struct PlayerAccount {
    /// Current player state.
    pub player: Player,
    /// Balance the account was opened with.
    pub opening_balance: Decimal,
    /// Every play, oldest first.
    pub sessions: Vec<GameSession>,
    /// Every ledger entry, oldest first.
    pub transactions: Vec<Transaction>,
}

impl PlayerAccount {
    /// Opens an account for a freshly created player.
    #[must_use]
    pub fn open(player: Player) -> Self {
        Self {
            opening_balance: player.balance,
            player,
            sessions: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// Sequence number the next posted entry must carry.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.transactions
            .last()
            .map_or(1, |t| t.sequence.saturating_add(1))
    }

    /// Installs a committed play.
    pub fn apply_play(&mut self, settlement: PlaySettlement) {
        let PlaySettlement {
            player,
            session,
            bet,
            win,
        } = settlement;
        self.player = player;
        self.sessions.push(session);
        self.transactions.push(bet);
        self.transactions.extend(win);
    }

    /// Installs a committed adjustment.
    pub fn apply_adjustment(&mut self, adjustment: Adjustment) {
        self.player = adjustment.player;
        self.transactions.push(adjustment.transaction);
    }

    /// Symbols of the most recent play, or [`Outcome::NEUTRAL`] before the
    /// first one.
    #[must_use]
    pub fn last_outcome(&self) -> Outcome {
        self.sessions
            .last()
            .map_or(Outcome::NEUTRAL, |s| s.outcome)
    }

    /// Aggregated play statistics.
    #[must_use]
    pub fn stats(&self) -> PlayerStats {
        let total_games = self.sessions.len() as u64;
        let wins = self.count(GameResult::Win);
        let jackpots = self.count(GameResult::Jackpot);
        let total_won = self
            .sessions
            .iter()
            .filter(|s| s.result != GameResult::Loss)
            .map(|s| s.win_amount)
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let win_rate = if total_games == 0 {
            0.0
        } else {
            wins as f64 / total_games as f64 * 100.0
        };
        PlayerStats {
            player_id: self.player.id,
            total_games,
            wins,
            jackpots,
            win_rate,
            total_won,
        }
    }

    /// Per-day result counts for sessions created at or after `since`,
    /// grouped by UTC calendar day, oldest day first. Days with no play are
    /// omitted.
    #[must_use]
    pub fn daily_results(&self, since: DateTime<Utc>) -> Vec<DailyResults> {
        let mut days: Vec<DailyResults> = Vec::new();
        for session in self.sessions.iter().filter(|s| s.created_at >= since) {
            let date = session.created_at.date_naive();
            if !matches!(days.last(), Some(day) if day.date == date) {
                days.push(DailyResults {
                    date,
                    wins: 0,
                    losses: 0,
                    jackpots: 0,
                });
            }
            let Some(day) = days.last_mut() else {
                continue;
            };
            match session.result {
                GameResult::Win => day.wins += 1,
                GameResult::Loss => day.losses += 1,
                GameResult::Jackpot => day.jackpots += 1,
            }
        }
        days
    }

    fn count(&self, result: GameResult) -> u64 {
        self.sessions.iter().filter(|s| s.result == result).count() as u64
    }
}

/// Summary figures for a player's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    /// Player the figures belong to.
    pub player_id: PlayerId,
    /// Number of plays.
    pub total_games: u64,
    /// Plays with result `WIN`.
    pub wins: u64,
    /// Plays with result `JACKPOT`.
    pub jackpots: u64,
    /// `wins / total_games * 100`, zero without plays.
    pub win_rate: f64,
    /// Sum of win amounts over paying plays.
    pub total_won: Decimal,
}

/// Result counts for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyResults {
    /// UTC day.
    pub date: chrono::NaiveDate,
    /// Plays with result `WIN`.
    pub wins: u32,
    /// Plays with result `LOSS`.
    pub losses: u32,
    /// Plays with result `JACKPOT`.
    pub jackpots: u32,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ledger::settle_play;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn play(account: &mut PlayerAccount, symbols: [u8; 5], at: DateTime<Utc>) {
        let Ok(outcome) = Outcome::new(symbols) else {
            panic!("valid outcome");
        };
        let Ok(settled) = settle_play(
            &account.player,
            account.next_sequence(),
            dec!(5.00),
            outcome,
            at,
        ) else {
            panic!("play should settle");
        };
        account.apply_play(settled);
    }

    #[test]
    fn fresh_account_shows_neutral_outcome() {
        let account = PlayerAccount::open(Player::new("c".to_string(), dec!(1000)));
        assert_eq!(account.last_outcome(), Outcome::NEUTRAL);
        assert_eq!(account.next_sequence(), 1);
        let stats = account.stats();
        assert_eq!(stats.total_games, 0);
        assert!(stats.win_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn apply_play_appends_records_in_order() {
        let mut account = PlayerAccount::open(Player::new("d".to_string(), dec!(1000)));
        play(&mut account, [1, 2, 3, 4, 5], Utc::now());
        play(&mut account, [5, 5, 5, 5, 5], Utc::now());
        assert_eq!(account.sessions.len(), 2);
        assert_eq!(account.transactions.len(), 3);
        assert_eq!(account.next_sequence(), 4);
        assert_eq!(account.last_outcome().symbols(), [5, 5, 5, 5, 5]);
        let Some(last) = account.transactions.last() else {
            panic!("ledger is empty");
        };
        assert_eq!(last.balance_after, account.player.balance);
    }

    #[test]
    fn stats_count_results() {
        let mut account = PlayerAccount::open(Player::new("e".to_string(), dec!(1000)));
        play(&mut account, [1, 2, 3, 4, 5], Utc::now());
        play(&mut account, [1, 1, 1, 4, 6], Utc::now());
        play(&mut account, [2, 2, 2, 2, 2], Utc::now());
        play(&mut account, [4, 4, 4, 1, 1], Utc::now());
        let stats = account.stats();
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.jackpots, 1);
        assert!((stats.win_rate - 50.0).abs() < 1e-9);
        // 7.50 + 100.00 + 5.00
        assert_eq!(stats.total_won, dec!(112.50));
    }

    #[test]
    fn daily_results_group_by_day() {
        let mut account = PlayerAccount::open(Player::new("f".to_string(), dec!(1000)));
        let day_one = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).single();
        let Some(day_one) = day_one else {
            panic!("valid timestamp");
        };
        let day_two = day_one + Duration::days(1);
        play(&mut account, [1, 2, 3, 4, 5], day_one - Duration::days(40));
        play(&mut account, [1, 2, 3, 4, 5], day_one);
        play(&mut account, [3, 3, 3, 3, 3], day_one + Duration::hours(2));
        play(&mut account, [1, 1, 1, 4, 6], day_two);

        let days = account.daily_results(day_one - Duration::days(30));
        assert_eq!(days.len(), 2);
        let (Some(first), Some(second)) = (days.first(), days.get(1)) else {
            panic!("two days expected");
        };
        assert_eq!(first.date, day_one.date_naive());
        assert_eq!((first.wins, first.losses, first.jackpots), (0, 1, 1));
        assert_eq!((second.wins, second.losses, second.jackpots), (1, 0, 0));
    }
}
