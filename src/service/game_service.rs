//! Game service: orchestrates plays, adjustments, and account reads.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::GameRules;
use crate::domain::ledger::{self, trail_is_consistent};
use crate::domain::{
    DailyResults, GameSession, Outcome, OutcomeSource, Player, PlayerAccount, PlayerId,
    PlayerRegistry, PlayerStats, Transaction, TransactionType,
};
use crate::error::GameError;
use crate::persistence::LedgerStore;

/// Shortest accepted username.
const MIN_USERNAME_LEN: usize = 3;

/// Longest accepted username.
const MAX_USERNAME_LEN: usize = 150;

/// Everything a caller learns from one play.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReceipt {
    /// The session record.
    pub session: GameSession,
    /// The stake debit.
    pub bet_transaction: Transaction,
    /// The payout credit, if the play paid.
    pub win_transaction: Option<Transaction>,
    /// Balance after the play.
    pub balance: Decimal,
}

/// One page of a newest-first listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-indexed page number.
    pub page: u32,
    /// Requested page size.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u32,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` items.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            self.total.div_ceil(self.per_page)
        }
    }
}

/// Orchestration layer for all player operations.
///
/// Every mutation follows the same pattern: take the player's write lock →
/// compute the next state with a pure ledger transition → commit it to the
/// [`LedgerStore`] → install it in the account → release the lock. A failed
/// commit returns before the install step, so the account is untouched.
#[derive(Debug, Clone)]
pub struct GameService {
    registry: Arc<PlayerRegistry>,
    store: LedgerStore,
    outcomes: Arc<dyn OutcomeSource>,
    rules: GameRules,
}

impl GameService {
    /// Creates a new `GameService`.
    #[must_use]
    pub fn new(
        registry: Arc<PlayerRegistry>,
        store: LedgerStore,
        outcomes: Arc<dyn OutcomeSource>,
        rules: GameRules,
    ) -> Self {
        Self {
            registry,
            store,
            outcomes,
            rules,
        }
    }

    /// Returns the configured game rules.
    #[must_use]
    pub const fn rules(&self) -> GameRules {
        self.rules
    }

    /// Returns a reference to the inner [`PlayerRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<PlayerRegistry> {
        &self.registry
    }

    /// Loads stored accounts into the registry. Returns how many were loaded.
    ///
    /// Accounts whose ledger does not chain from the opening balance to the
    /// current balance are still loaded, with a warning.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError`] if the store cannot be read or an account
    /// cannot be inserted.
    pub async fn restore(&self) -> Result<usize, GameError> {
        let accounts = self.store.load_accounts().await?;
        let count = accounts.len();
        for account in accounts {
            if !trail_is_consistent(
                account.opening_balance,
                &account.transactions,
                account.player.balance,
            ) {
                tracing::warn!(player_id = %account.player.id, "ledger trail does not match balance");
            }
            self.registry.insert(account).await?;
        }
        tracing::info!(accounts = count, "accounts restored");
        Ok(count)
    }

    /// Registers a player holding the configured seed balance.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRequest`] for a malformed username,
    /// [`GameError::UsernameTaken`] if it is in use, or
    /// [`GameError::PersistenceFailure`] if the player cannot be stored.
    pub async fn register_player(&self, username: &str) -> Result<Player, GameError> {
        let username = validate_username(username)?;
        self.registry.ensure_username_free(&username).await?;

        let player = Player::new(username, self.rules.seed_balance);
        self.store.insert_player(&player).await?;
        self.registry
            .insert(PlayerAccount::open(player.clone()))
            .await?;

        tracing::info!(player_id = %player.id, username = %player.username, "player registered");
        Ok(player)
    }

    /// Plays one round at the configured fixed bet.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`], [`GameError::InsufficientFunds`]
    /// when the balance is below the bet (nothing is recorded), or
    /// [`GameError::PersistenceFailure`] when the commit fails (nothing is
    /// recorded either).
    pub async fn play(&self, player_id: PlayerId) -> Result<PlayReceipt, GameError> {
        let bet = self.rules.min_bet;
        let account_lock = self.registry.get(player_id).await?;
        let mut account = account_lock.write().await;

        if account.player.balance < bet {
            tracing::info!(%player_id, balance = %account.player.balance, %bet, "play refused: insufficient funds");
            return Err(GameError::InsufficientFunds {
                balance: account.player.balance,
                required: bet,
            });
        }

        let outcome = Outcome::from_raw(&self.outcomes.draw());
        let settlement = ledger::settle_play(
            &account.player,
            account.next_sequence(),
            bet,
            outcome,
            Utc::now(),
        )?;

        self.store
            .commit_play(account.player.balance, &settlement)
            .await?;

        let receipt = PlayReceipt {
            session: settlement.session.clone(),
            bet_transaction: settlement.bet.clone(),
            win_transaction: settlement.win.clone(),
            balance: settlement.player.balance,
        };
        account.apply_play(settlement);
        drop(account);

        tracing::info!(
            %player_id,
            %outcome,
            tier = ?receipt.session.tier,
            win = %receipt.session.win_amount,
            balance = %receipt.balance,
            "play settled"
        );
        Ok(receipt)
    }

    /// Posts a DEPOSIT, WITHDRAWAL or BONUS entry.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRequest`] for BET/WIN kinds,
    /// [`GameError::InvalidAmount`], [`GameError::InsufficientFunds`] for an
    /// overdrawing withdrawal, [`GameError::PlayerNotFound`], or
    /// [`GameError::PersistenceFailure`].
    pub async fn adjust_balance(
        &self,
        player_id: PlayerId,
        kind: TransactionType,
        amount: Decimal,
    ) -> Result<(Player, Transaction), GameError> {
        let account_lock = self.registry.get(player_id).await?;
        let mut account = account_lock.write().await;

        let adjustment = ledger::adjust(
            &account.player,
            account.next_sequence(),
            kind,
            amount,
            Utc::now(),
        )?;
        self.store
            .commit_adjustment(account.player.balance, &adjustment)
            .await?;

        let result = (adjustment.player.clone(), adjustment.transaction.clone());
        account.apply_adjustment(adjustment);
        drop(account);

        tracing::info!(
            %player_id,
            kind = kind.as_str(),
            amount = %result.1.amount,
            balance = %result.0.balance,
            "balance adjusted"
        );
        Ok(result)
    }

    /// Returns the current player state.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if no such player exists.
    pub async fn player(&self, player_id: PlayerId) -> Result<Player, GameError> {
        let account_lock = self.registry.get(player_id).await?;
        let account = account_lock.read().await;
        Ok(account.player.clone())
    }

    /// Returns profile statistics.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if no such player exists.
    pub async fn stats(&self, player_id: PlayerId) -> Result<PlayerStats, GameError> {
        let account_lock = self.registry.get(player_id).await?;
        let account = account_lock.read().await;
        Ok(account.stats())
    }

    /// Returns the symbols of the latest play, or the neutral sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if no such player exists.
    pub async fn last_outcome(&self, player_id: PlayerId) -> Result<Outcome, GameError> {
        let account_lock = self.registry.get(player_id).await?;
        let account = account_lock.read().await;
        Ok(account.last_outcome())
    }

    /// Returns one page of game sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if no such player exists.
    pub async fn sessions(
        &self,
        player_id: PlayerId,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GameSession>, GameError> {
        let account_lock = self.registry.get(player_id).await?;
        let account = account_lock.read().await;
        tracing::debug!(%player_id, page, per_page, "listing sessions");
        Ok(paginate(&account.sessions, page, per_page))
    }

    /// Returns one page of ledger entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if no such player exists.
    pub async fn transactions(
        &self,
        player_id: PlayerId,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Transaction>, GameError> {
        let account_lock = self.registry.get(player_id).await?;
        let account = account_lock.read().await;
        tracing::debug!(%player_id, page, per_page, "listing ledger entries");
        Ok(paginate(&account.transactions, page, per_page))
    }

    /// Returns per-day result counts over the last `days` days.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if no such player exists.
    pub async fn daily_results(
        &self,
        player_id: PlayerId,
        days: u32,
    ) -> Result<Vec<DailyResults>, GameError> {
        let since = Utc::now() - Duration::days(i64::from(days));
        let account_lock = self.registry.get(player_id).await?;
        let account = account_lock.read().await;
        Ok(account.daily_results(since))
    }
}

/// Trims and validates a username: 3–150 characters drawn from letters,
/// digits and `@ . + - _`.
fn validate_username(raw: &str) -> Result<String, GameError> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(GameError::InvalidRequest(format!(
            "username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
        )));
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')))
    {
        return Err(GameError::InvalidRequest(format!(
            "username contains invalid character {bad:?}"
        )));
    }
    Ok(username.to_string())
}

/// Slices `items` (oldest first) into a newest-first page. Pages past the end
/// are empty.
fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let skip = (page - 1).saturating_mul(per_page) as usize;
    let items = items
        .iter()
        .rev()
        .skip(skip)
        .take(per_page as usize)
        .cloned()
        .collect();
    Page {
        items,
        page,
        per_page,
        total,
    }
}
