//! Concurrent account storage with per-player locking.
//!
//! [`PlayerRegistry`] stores every account in a `HashMap` where each entry is
//! individually protected by a [`tokio::sync::RwLock`]. Plays and adjustments
//! take the entry's write lock for their whole duration, so two operations on
//! the same player never interleave, while different players proceed in
//! parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::PlayerId;
use super::player_account::PlayerAccount;
use crate::error::GameError;

#[derive(Debug, Default)]
struct Accounts {
    by_id: HashMap<PlayerId, Arc<RwLock<PlayerAccount>>>,
    by_username: HashMap<String, PlayerId>,
}

/// Central store for all player accounts.
///
/// # Concurrency
///
/// - Reads of the same account are concurrent.
/// - Writes to different accounts are concurrent.
/// - Writes to the same account are serialized.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    accounts: RwLock<Accounts>,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with [`GameError::UsernameTaken`] if `username` is registered.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UsernameTaken`] when the name is in use.
    pub async fn ensure_username_free(&self, username: &str) -> Result<(), GameError> {
        if self.accounts.read().await.by_username.contains_key(username) {
            return Err(GameError::UsernameTaken(username.to_string()));
        }
        Ok(())
    }

    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UsernameTaken`] if the username is already
    /// registered, or [`GameError::InvalidRequest`] on an id collision.
    pub async fn insert(&self, account: PlayerAccount) -> Result<PlayerId, GameError> {
        let player_id = account.player.id;
        let mut accounts = self.accounts.write().await;
        if accounts.by_username.contains_key(&account.player.username) {
            return Err(GameError::UsernameTaken(account.player.username));
        }
        if accounts.by_id.contains_key(&player_id) {
            return Err(GameError::InvalidRequest(format!(
                "player {player_id} already exists"
            )));
        }
        accounts
            .by_username
            .insert(account.player.username.clone(), player_id);
        accounts
            .by_id
            .insert(player_id, Arc::new(RwLock::new(account)));
        Ok(player_id)
    }

    /// Returns the lock guarding one account.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] if no such player exists.
    pub async fn get(&self, player_id: PlayerId) -> Result<Arc<RwLock<PlayerAccount>>, GameError> {
        let accounts = self.accounts.read().await;
        accounts
            .by_id
            .get(&player_id)
            .cloned()
            .ok_or(GameError::PlayerNotFound(*player_id.as_uuid()))
    }

    /// Looks up a player id by username.
    pub async fn find_by_username(&self, username: &str) -> Option<PlayerId> {
        self.accounts.read().await.by_username.get(username).copied()
    }

    /// Returns the number of accounts in the registry.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_id.len()
    }

    /// Returns `true` if the registry holds no accounts.
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.by_id.is_empty()
    }
}
