//! Ledger records and the pure state transitions that produce them.
//!
//! [`settle_play`] and [`adjust`] take the current [`Player`] by reference
//! and return the next `Player` together with the records to persist. Nothing
//! is mutated in place, so a failed commit leaves the caller's state as it
//! was.
//!
//! Every [`Transaction`] carries a per-player `sequence` and a
//! `balance_after` snapshot such that
//! `balance_after[n] == balance_after[n - 1] + amount[n]`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money::{MAX_AMOUNT, round_currency};
use super::outcome::Outcome;
use super::paytable::{GameResult, WinTier};
use super::player::Player;
use super::{PlayerId, SessionId, TransactionId};
use crate::error::GameError;

/// Kind of ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Stake placed by a play.
    Bet,
    /// Payout credited by a play.
    Win,
    /// Funds added by an operator.
    Deposit,
    /// Funds removed by an operator.
    Withdrawal,
    /// Promotional credit.
    Bonus,
}

impl TransactionType {
    /// Whether this kind lowers the balance.
    #[must_use]
    pub const fn is_debit(self) -> bool {
        matches!(self, Self::Bet | Self::Withdrawal)
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bet => "BET",
            Self::Win => "WIN",
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Bonus => "BONUS",
        }
    }

    /// Parses the stored string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "BET" => Some(Self::Bet),
            "WIN" => Some(Self::Win),
            "DEPOSIT" => Some(Self::Deposit),
            "WITHDRAWAL" => Some(Self::Withdrawal),
            "BONUS" => Some(Self::Bonus),
            _ => None,
        }
    }
}

/// Immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// Entry identifier.
    pub id: TransactionId,
    /// Owning player.
    pub player_id: PlayerId,
    /// Position in the player's ledger, starting at 1.
    pub sequence: u64,
    /// Signed amount: negative for debits, positive for credits.
    pub amount: Decimal,
    /// Movement kind.
    pub kind: TransactionType,
    /// Session that produced this entry, for BET and WIN entries.
    pub session_id: Option<SessionId>,
    /// Player balance right after this entry.
    pub balance_after: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Immutable record of one play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSession {
    /// Session identifier.
    pub id: SessionId,
    /// Player who played.
    pub player_id: PlayerId,
    /// Stake, always positive.
    pub bet_amount: Decimal,
    /// Paytable tier the outcome fell into.
    pub tier: WinTier,
    /// Externally visible result.
    pub result: GameResult,
    /// Amount paid out; zero on a loss.
    pub win_amount: Decimal,
    /// Symbols shown.
    pub outcome: Outcome,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Everything one play produces.
#[derive(Debug, Clone)]
pub struct PlaySettlement {
    /// Player state after the play.
    pub player: Player,
    /// The session record.
    pub session: GameSession,
    /// The stake debit.
    pub bet: Transaction,
    /// The payout credit, present only when the win amount is positive.
    pub win: Option<Transaction>,
}

impl PlaySettlement {
    /// Ledger entries in the order they were posted.
    pub fn entries(&self) -> impl Iterator<Item = &Transaction> {
        std::iter::once(&self.bet).chain(self.win.as_ref())
    }
}

/// Result of a balance adjustment.
#[derive(Debug, Clone)]
pub struct Adjustment {
    /// Player state after the adjustment.
    pub player: Player,
    /// The posted entry.
    pub transaction: Transaction,
}

/// Settles one play for `player`.
///
/// `next_sequence` is the sequence number for the first entry posted (the
/// BET); the WIN, if any, takes the following number.
///
/// # Errors
///
/// Returns [`GameError::InvalidAmount`] for a bet outside `(0, MAX_AMOUNT)`
/// or an overflowing payout, and
/// [`GameError::InsufficientFunds`] when the balance is below `bet`.
pub fn settle_play(
    player: &Player,
    next_sequence: u64,
    bet: Decimal,
    outcome: Outcome,
    now: DateTime<Utc>,
) -> Result<PlaySettlement, GameError> {
    let bet = checked_amount("bet", bet)?;
    if player.balance < bet {
        return Err(GameError::InsufficientFunds {
            balance: player.balance,
            required: bet,
        });
    }

    let mut next = player.clone();
    let bet_entry = post(&mut next, next_sequence, TransactionType::Bet, bet, None, now)?;

    let tier = WinTier::classify(&outcome);
    let win_amount = tier
        .payout(bet)
        .ok_or_else(|| GameError::InvalidAmount(format!("payout for bet {bet} overflows")))?;
    let session = GameSession {
        id: SessionId::new(),
        player_id: player.id,
        bet_amount: bet,
        tier,
        result: tier.result(),
        win_amount,
        outcome,
        created_at: now,
    };
    let bet_entry = Transaction {
        session_id: Some(session.id),
        ..bet_entry
    };

    let win_entry = if win_amount > Decimal::ZERO {
        let entry = post(
            &mut next,
            next_sequence.saturating_add(1),
            TransactionType::Win,
            win_amount,
            Some(session.id),
            now,
        )?;
        next.wins = next.wins.saturating_add(1);
        Some(entry)
    } else {
        next.losses = next.losses.saturating_add(1);
        None
    };
    next.last_activity = now;

    Ok(PlaySettlement {
        player: next,
        session,
        bet: bet_entry,
        win: win_entry,
    })
}

/// Applies an operator adjustment (DEPOSIT, WITHDRAWAL or BONUS).
///
/// # Errors
///
/// Returns [`GameError::InvalidRequest`] for BET or WIN kinds,
/// [`GameError::InvalidAmount`] for an amount outside `(0, MAX_AMOUNT)` or a
/// resulting balance at or above it, and
/// [`GameError::InsufficientFunds`] for a withdrawal larger than the balance.
pub fn adjust(
    player: &Player,
    next_sequence: u64,
    kind: TransactionType,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<Adjustment, GameError> {
    if matches!(kind, TransactionType::Bet | TransactionType::Win) {
        return Err(GameError::InvalidRequest(format!(
            "{} entries are posted by plays only",
            kind.as_str()
        )));
    }
    let amount = checked_amount("amount", amount)?;

    let mut next = player.clone();
    let transaction = post(&mut next, next_sequence, kind, amount, None, now)?;
    next.last_activity = now;
    Ok(Adjustment {
        player: next,
        transaction,
    })
}

/// Rounds a caller-supplied amount and checks it lies in `(0, MAX_AMOUNT)`.
fn checked_amount(what: &str, amount: Decimal) -> Result<Decimal, GameError> {
    if amount >= MAX_AMOUNT {
        return Err(GameError::InvalidAmount(format!(
            "{what} must be below {MAX_AMOUNT}, got {amount}"
        )));
    }
    let amount = round_currency(amount);
    if amount <= Decimal::ZERO {
        return Err(GameError::InvalidAmount(format!(
            "{what} must be positive, got {amount}"
        )));
    }
    Ok(amount)
}

/// Posts one entry of absolute size `magnitude` to `player`.
fn post(
    player: &mut Player,
    sequence: u64,
    kind: TransactionType,
    magnitude: Decimal,
    session_id: Option<SessionId>,
    now: DateTime<Utc>,
) -> Result<Transaction, GameError> {
    let amount = if kind.is_debit() { -magnitude } else { magnitude };
    let balance_after = player
        .balance
        .checked_add(amount)
        .map(round_currency)
        .filter(|b| *b < MAX_AMOUNT)
        .ok_or_else(|| {
            GameError::InvalidAmount(format!(
                "balance {} plus {amount} exceeds {MAX_AMOUNT}",
                player.balance
            ))
        })?;
    if balance_after < Decimal::ZERO {
        return Err(GameError::InsufficientFunds {
            balance: player.balance,
            required: magnitude,
        });
    }
    player.balance = balance_after;
    player.updated_at = now;
    Ok(Transaction {
        id: TransactionId::new(),
        player_id: player.id,
        sequence,
        amount,
        kind,
        session_id,
        balance_after,
        created_at: now,
    })
}

/// Checks that `entries` (in sequence order) chain from `opening` balance to
/// `closing` balance with consistent `balance_after` snapshots.
#[must_use]
pub fn trail_is_consistent(opening: Decimal, entries: &[Transaction], closing: Decimal) -> bool {
    let mut running = opening;
    let mut last_sequence = 0;
    for entry in entries {
        if entry.sequence <= last_sequence {
            return false;
        }
        running += entry.amount;
        if running != entry.balance_after {
            return false;
        }
        last_sequence = entry.sequence;
    }
    running == closing
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn player_with(balance: Decimal) -> Player {
        Player::new("bob".to_string(), balance)
    }

    fn outcome(symbols: [u8; 5]) -> Outcome {
        let Ok(outcome) = Outcome::new(symbols) else {
            panic!("valid outcome");
        };
        outcome
    }

    #[test]
    fn losing_play_posts_only_the_bet() {
        let player = player_with(dec!(1000.00));
        let Ok(settled) = settle_play(&player, 1, dec!(5.00), outcome([1, 2, 3, 4, 5]), Utc::now())
        else {
            panic!("play should settle");
        };
        assert!(settled.win.is_none());
        assert_eq!(settled.bet.amount, dec!(-5.00));
        assert_eq!(settled.bet.balance_after, dec!(995.00));
        assert_eq!(settled.bet.session_id, Some(settled.session.id));
        assert_eq!(settled.session.result, GameResult::Loss);
        assert_eq!(settled.session.win_amount, dec!(0.00));
        assert_eq!(settled.player.balance, dec!(995.00));
        assert_eq!(settled.player.losses, 1);
        assert_eq!(settled.player.wins, 0);
        // The input is untouched.
        assert_eq!(player.balance, dec!(1000.00));
    }

    #[test]
    fn winning_play_posts_bet_then_win() {
        let player = player_with(dec!(1000.00));
        let Ok(settled) = settle_play(&player, 4, dec!(5.00), outcome([3, 3, 3, 3, 3]), Utc::now())
        else {
            panic!("play should settle");
        };
        let Some(win) = settled.win.as_ref() else {
            panic!("jackpot should pay");
        };
        assert_eq!(settled.session.result, GameResult::Jackpot);
        assert_eq!(win.amount, dec!(100.00));
        assert_eq!(win.balance_after, dec!(1095.00));
        assert_eq!(win.sequence, 5);
        assert_eq!(settled.bet.sequence, 4);
        assert_eq!(win.session_id, Some(settled.session.id));
        assert_eq!(settled.player.balance, dec!(1095.00));
        assert_eq!(settled.player.wins, 1);
        assert_eq!(settled.entries().count(), 2);
    }

    #[test]
    fn play_below_bet_is_rejected() {
        let player = player_with(dec!(3.00));
        let result = settle_play(&player, 1, dec!(5.00), outcome([1, 2, 3, 4, 5]), Utc::now());
        assert!(matches!(result, Err(GameError::InsufficientFunds { .. })));
    }

    #[test]
    fn play_with_exact_balance_reaches_zero() {
        let player = player_with(dec!(5.00));
        let Ok(settled) = settle_play(&player, 1, dec!(5.00), outcome([1, 2, 3, 4, 6]), Utc::now())
        else {
            panic!("play should settle");
        };
        assert_eq!(settled.player.balance, Decimal::ZERO);
    }

    #[test]
    fn deposit_and_withdrawal() {
        let player = player_with(dec!(10.00));
        let Ok(dep) = adjust(&player, 1, TransactionType::Deposit, dec!(2.505), Utc::now()) else {
            panic!("deposit should apply");
        };
        assert_eq!(dep.transaction.amount, dec!(2.51));
        assert_eq!(dep.player.balance, dec!(12.51));

        let Ok(wd) = adjust(&dep.player, 2, TransactionType::Withdrawal, dec!(12.51), Utc::now())
        else {
            panic!("withdrawal should apply");
        };
        assert_eq!(wd.transaction.amount, dec!(-12.51));
        assert_eq!(wd.player.balance, dec!(0.00));
    }

    #[test]
    fn overdrawing_withdrawal_is_rejected() {
        let player = player_with(dec!(10.00));
        let result = adjust(&player, 1, TransactionType::Withdrawal, dec!(10.01), Utc::now());
        assert!(matches!(result, Err(GameError::InsufficientFunds { .. })));
    }

    #[test]
    fn adjustments_reject_play_kinds_and_bad_amounts() {
        let player = player_with(dec!(10.00));
        assert!(matches!(
            adjust(&player, 1, TransactionType::Win, dec!(1), Utc::now()),
            Err(GameError::InvalidRequest(_))
        ));
        assert!(matches!(
            adjust(&player, 1, TransactionType::Bonus, dec!(0), Utc::now()),
            Err(GameError::InvalidAmount(_))
        ));
        assert!(matches!(
            adjust(&player, 1, TransactionType::Deposit, dec!(-4), Utc::now()),
            Err(GameError::InvalidAmount(_))
        ));
    }

    #[test]
    fn chained_plays_keep_a_consistent_trail() {
        let opening = dec!(1000.00);
        let mut player = player_with(opening);
        let mut trail = Vec::new();
        let outcomes = [
            [1, 2, 3, 4, 5],
            [4, 4, 4, 1, 1],
            [2, 2, 5, 5, 1],
            [1, 1, 1, 4, 6],
            [6, 6, 6, 6, 2],
        ];
        for symbols in outcomes {
            let next_sequence = trail.len() as u64 + 1;
            let Ok(settled) =
                settle_play(&player, next_sequence, dec!(5.00), outcome(symbols), Utc::now())
            else {
                panic!("play should settle");
            };
            trail.extend(settled.entries().cloned());
            player = settled.player;
        }
        assert!(trail_is_consistent(opening, &trail, player.balance));
        let total: Decimal = trail.iter().map(|t| t.amount).sum();
        assert_eq!(total, player.balance - opening);
        // 5 bets, 4 paying outcomes.
        assert_eq!(trail.len(), 9);
        assert_eq!(player.wins, 4);
        assert_eq!(player.losses, 1);
    }

    #[test]
    fn trail_check_detects_tampering() {
        let player = player_with(dec!(50.00));
        let Ok(settled) = settle_play(&player, 1, dec!(5.00), outcome([1, 2, 3, 4, 5]), Utc::now())
        else {
            panic!("play should settle");
        };
        let mut bet = settled.bet;
        bet.balance_after = dec!(50.00);
        assert!(!trail_is_consistent(dec!(50.00), &[bet], dec!(45.00)));
    }

    #[test]
    fn oversized_amounts_are_rejected_without_overflow() {
        let player = player_with(dec!(1000.00));
        for amount in [Decimal::MAX, MAX_AMOUNT] {
            let result = adjust(&player, 1, TransactionType::Deposit, amount, Utc::now());
            assert!(matches!(result, Err(GameError::InvalidAmount(_))), "{amount}");
        }
        let result = settle_play(&player, 1, Decimal::MAX, outcome([3, 3, 3, 3, 3]), Utc::now());
        assert!(matches!(result, Err(GameError::InvalidAmount(_))));
    }

    #[test]
    fn balance_may_not_reach_the_storage_bound() {
        let player = player_with(dec!(9999999999.00));
        let result = adjust(&player, 1, TransactionType::Bonus, dec!(1.00), Utc::now());
        assert!(matches!(result, Err(GameError::InvalidAmount(_))));

        let Ok(adjusted) = adjust(&player, 1, TransactionType::Bonus, dec!(0.99), Utc::now())
        else {
            panic!("deposit below the bound should post");
        };
        assert_eq!(adjusted.player.balance, dec!(9999999999.99));
    }

    #[test]
    fn transaction_type_string_forms() {
        for kind in [
            TransactionType::Bet,
            TransactionType::Win,
            TransactionType::Deposit,
            TransactionType::Withdrawal,
            TransactionType::Bonus,
        ] {
            assert_eq!(TransactionType::parse(kind.as_str()), Some(kind));
        }
        assert!(TransactionType::Withdrawal.is_debit());
        assert!(!TransactionType::Bonus.is_debit());
    }
}
