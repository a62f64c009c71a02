//! Persistence layer: durable storage for accounts, sessions, and ledger.
//!
//! [`LedgerStore`] is what the service commits through. The PostgreSQL
//! backend writes each play or adjustment in one SQL transaction; the
//! in-memory backend keeps state in the [`crate::domain::PlayerRegistry`]
//! only and accepts every commit.

pub mod models;
pub mod postgres;

use rust_decimal::Decimal;

use crate::domain::{Adjustment, PlaySettlement, Player, PlayerAccount};
use crate::error::GameError;

pub use postgres::PostgresPersistence;

/// Durable backend behind the game service.
#[derive(Debug, Clone)]
pub enum LedgerStore {
    /// No durable storage; accounts vanish on restart.
    InMemory,
    /// PostgreSQL storage.
    Postgres(PostgresPersistence),
    /// Rejects every write. Used to exercise rollback paths.
    #[cfg(test)]
    Unavailable,
}

impl LedgerStore {
    /// Persists a newly registered player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UsernameTaken`] or
    /// [`GameError::PersistenceFailure`] from the backend.
    pub async fn insert_player(&self, player: &Player) -> Result<(), GameError> {
        match self {
            Self::InMemory => Ok(()),
            Self::Postgres(pg) => pg.insert_player(player).await,
            #[cfg(test)]
            Self::Unavailable => Err(unavailable()),
        }
    }

    /// Commits one play atomically.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceFailure`] if nothing was written.
    pub async fn commit_play(
        &self,
        expected_balance: Decimal,
        settlement: &PlaySettlement,
    ) -> Result<(), GameError> {
        match self {
            Self::InMemory => Ok(()),
            Self::Postgres(pg) => pg.commit_play(expected_balance, settlement).await,
            #[cfg(test)]
            Self::Unavailable => Err(unavailable()),
        }
    }

    /// Commits one adjustment atomically.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceFailure`] if nothing was written.
    pub async fn commit_adjustment(
        &self,
        expected_balance: Decimal,
        adjustment: &Adjustment,
    ) -> Result<(), GameError> {
        match self {
            Self::InMemory => Ok(()),
            Self::Postgres(pg) => pg.commit_adjustment(expected_balance, adjustment).await,
            #[cfg(test)]
            Self::Unavailable => Err(unavailable()),
        }
    }

    /// Loads all stored accounts.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceFailure`] on backend failure.
    pub async fn load_accounts(&self) -> Result<Vec<PlayerAccount>, GameError> {
        match self {
            Self::InMemory => Ok(Vec::new()),
            Self::Postgres(pg) => pg.load_accounts().await,
            #[cfg(test)]
            Self::Unavailable => Err(unavailable()),
        }
    }
}

#[cfg(test)]
fn unavailable() -> GameError {
    GameError::PersistenceFailure("store unavailable".to_string())
}
