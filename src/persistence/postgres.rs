//! PostgreSQL implementation of the persistence layer.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::models::{
    PlayerRow, SessionRow, TransactionRow, player_from_row, session_from_row, transaction_from_row,
};
use crate::domain::{
    Adjustment, GameSession, PlaySettlement, Player, PlayerAccount, PlayerId, Transaction,
};
use crate::error::GameError;

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
///
/// Every write runs inside one SQL transaction that locks the player row and
/// checks the stored balance against the balance the in-memory transition
/// started from. Any mismatch or failure rolls the whole write back.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending schema migrations from `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError::PersistenceFailure`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), GameError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GameError::PersistenceFailure(e.to_string()))
    }

    /// Inserts a freshly registered player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UsernameTaken`] on a unique-constraint violation
    /// and [`GameError::PersistenceFailure`] on any other database failure.
    pub async fn insert_player(&self, player: &Player) -> Result<(), GameError> {
        sqlx::query(
            "INSERT INTO players \
             (id, username, balance, opening_balance, wins, losses, created_at, updated_at, last_activity) \
             VALUES ($1, $2, $3, $3, $4, $5, $6, $7, $8)",
        )
        .bind(player.id.as_uuid())
        .bind(&player.username)
        .bind(player.balance)
        .bind(to_i32(player.wins)?)
        .bind(to_i32(player.losses)?)
        .bind(player.created_at)
        .bind(player.updated_at)
        .bind(player.last_activity)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                GameError::UsernameTaken(player.username.clone())
            }
            other => GameError::from(other),
        })?;
        Ok(())
    }

    /// Commits one play: the session, its BET and optional WIN entries, and
    /// the updated player row.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceFailure`] if the stored balance differs
    /// from `expected_balance` or any statement fails. Nothing is written in
    /// that case.
    pub async fn commit_play(
        &self,
        expected_balance: Decimal,
        settlement: &PlaySettlement,
    ) -> Result<(), GameError> {
        let mut tx = self.pool.begin().await?;
        lock_player(&mut tx, settlement.player.id, expected_balance).await?;
        insert_session(&mut tx, &settlement.session).await?;
        for entry in settlement.entries() {
            insert_transaction(&mut tx, entry).await?;
        }
        update_player(&mut tx, &settlement.player).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Commits one balance adjustment.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::commit_play`].
    pub async fn commit_adjustment(
        &self,
        expected_balance: Decimal,
        adjustment: &Adjustment,
    ) -> Result<(), GameError> {
        let mut tx = self.pool.begin().await?;
        lock_player(&mut tx, adjustment.player.id, expected_balance).await?;
        insert_transaction(&mut tx, &adjustment.transaction).await?;
        update_player(&mut tx, &adjustment.player).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Loads every account with its sessions and ledger, in posting order.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError::PersistenceFailure`] on database failure or a
    /// corrupt row.
    pub async fn load_accounts(&self) -> Result<Vec<PlayerAccount>, GameError> {
        let players = sqlx::query_as::<_, PlayerRow>(
            "SELECT id, username, balance, opening_balance, wins, losses, \
             created_at, updated_at, last_activity FROM players ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        // Sessions are ordered by the sequence of their BET entry.
        let sessions = sqlx::query_as::<_, SessionRow>(
            "SELECT s.id, s.player_id, s.bet_amount, s.result, s.win_amount, s.numbers, s.created_at \
             FROM game_sessions s \
             JOIN transactions t ON t.game_session_id = s.id AND t.transaction_type = 'BET' \
             ORDER BY s.player_id, t.sequence ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let transactions = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, player_id, sequence, amount, transaction_type, game_session_id, \
             balance_after, created_at FROM transactions ORDER BY player_id, sequence ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut order = Vec::with_capacity(players.len());
        let mut accounts: HashMap<PlayerId, PlayerAccount> = HashMap::with_capacity(players.len());
        for row in players {
            let (player, opening_balance) = player_from_row(row)?;
            order.push(player.id);
            accounts.insert(
                player.id,
                PlayerAccount {
                    player,
                    opening_balance,
                    sessions: Vec::new(),
                    transactions: Vec::new(),
                },
            );
        }
        for row in sessions {
            let session = session_from_row(row)?;
            if let Some(account) = accounts.get_mut(&session.player_id) {
                account.sessions.push(session);
            }
        }
        for row in transactions {
            let entry = transaction_from_row(row)?;
            if let Some(account) = accounts.get_mut(&entry.player_id) {
                account.transactions.push(entry);
            }
        }

        Ok(order
            .into_iter()
            .filter_map(|id| accounts.remove(&id))
            .collect())
    }
}

type PgTx = sqlx::Transaction<'static, Postgres>;

async fn lock_player(
    tx: &mut PgTx,
    player_id: PlayerId,
    expected_balance: Decimal,
) -> Result<(), GameError> {
    let stored = sqlx::query_scalar::<_, Decimal>(
        "SELECT balance FROM players WHERE id = $1 FOR UPDATE",
    )
    .bind(player_id.as_uuid())
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| GameError::PersistenceFailure(format!("player {player_id} has no row")))?;
    if stored != expected_balance {
        return Err(GameError::PersistenceFailure(format!(
            "stored balance {stored} for player {player_id} does not match expected {expected_balance}"
        )));
    }
    Ok(())
}

async fn insert_session(tx: &mut PgTx, session: &GameSession) -> Result<(), GameError> {
    let numbers = serde_json::to_value(session.outcome.symbols())
        .map_err(|e| GameError::Internal(e.to_string()))?;
    sqlx::query(
        "INSERT INTO game_sessions (id, player_id, bet_amount, result, win_amount, numbers, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(session.id.as_uuid())
    .bind(session.player_id.as_uuid())
    .bind(session.bet_amount)
    .bind(session.result.as_str())
    .bind(session.win_amount)
    .bind(numbers)
    .bind(session.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_transaction(tx: &mut PgTx, entry: &Transaction) -> Result<(), GameError> {
    let sequence = i64::try_from(entry.sequence)
        .map_err(|e| GameError::Internal(format!("sequence out of range: {e}")))?;
    sqlx::query(
        "INSERT INTO transactions \
         (id, player_id, sequence, amount, transaction_type, game_session_id, balance_after, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(entry.id.as_uuid())
    .bind(entry.player_id.as_uuid())
    .bind(sequence)
    .bind(entry.amount)
    .bind(entry.kind.as_str())
    .bind(entry.session_id.map(Uuid::from))
    .bind(entry.balance_after)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn update_player(tx: &mut PgTx, player: &Player) -> Result<(), GameError> {
    sqlx::query(
        "UPDATE players SET balance = $2, wins = $3, losses = $4, updated_at = $5, last_activity = $6 \
         WHERE id = $1",
    )
    .bind(player.id.as_uuid())
    .bind(player.balance)
    .bind(to_i32(player.wins)?)
    .bind(to_i32(player.losses)?)
    .bind(player.updated_at)
    .bind(player.last_activity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn to_i32(counter: u32) -> Result<i32, GameError> {
    i32::try_from(counter).map_err(|e| GameError::Internal(format!("counter out of range: {e}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::ledger::settle_play;
    use crate::domain::Outcome;

    /// Connects to `DATABASE_URL` and migrates, or returns `None` when the
    /// variable is unset so the test is skipped.
    async fn connect() -> Option<PostgresPersistence> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let Ok(pool) = PgPool::connect(&url).await else {
            panic!("cannot connect to {url}");
        };
        let persistence = PostgresPersistence::new(pool);
        let Ok(()) = persistence.migrate().await else {
            panic!("migration failed");
        };
        Some(persistence)
    }

    async fn stored_balance(persistence: &PostgresPersistence, player: &Player) -> Decimal {
        let Ok(balance) =
            sqlx::query_scalar::<_, Decimal>("SELECT balance FROM players WHERE id = $1")
                .bind(player.id.as_uuid())
                .fetch_one(&persistence.pool)
                .await
        else {
            panic!("player row missing");
        };
        balance
    }

    #[tokio::test]
    async fn stale_commit_is_rejected_and_writes_nothing() {
        let Some(persistence) = connect().await else {
            return;
        };
        let player = Player::new(format!("stale-{}", Uuid::new_v4().simple()), dec!(1000.00));
        let Ok(()) = persistence.insert_player(&player).await else {
            panic!("insert failed");
        };
        let Ok(outcome) = Outcome::new([3, 3, 3, 3, 3]) else {
            panic!("valid outcome");
        };
        let Ok(settlement) = settle_play(&player, 1, dec!(5.00), outcome, Utc::now()) else {
            panic!("play should settle");
        };

        let stale = persistence.commit_play(dec!(990.00), &settlement).await;
        assert!(matches!(stale, Err(GameError::PersistenceFailure(_))));
        assert_eq!(stored_balance(&persistence, &player).await, dec!(1000.00));

        let Ok(()) = persistence.commit_play(player.balance, &settlement).await else {
            panic!("fresh commit should succeed");
        };
        assert_eq!(
            stored_balance(&persistence, &player).await,
            settlement.player.balance
        );

        // Replaying the same commit is now stale as well.
        let replay = persistence.commit_play(player.balance, &settlement).await;
        assert!(matches!(replay, Err(GameError::PersistenceFailure(_))));
    }
}
