//! Domain layer: outcome generation, paytable, ledger, and account storage.
//!
//! This module contains the server-side game model: typed identifiers,
//! the outcome generator, the fixed paytable classifier, the pure ledger
//! transitions for plays and adjustments, and the registry that serializes
//! access per player.

pub mod ids;
pub mod ledger;
pub mod money;
pub mod outcome;
pub mod paytable;
pub mod player;
pub mod player_account;
pub mod player_registry;

pub use ids::{PlayerId, SessionId, TransactionId};
pub use ledger::{Adjustment, GameSession, PlaySettlement, Transaction, TransactionType};
pub use outcome::{Outcome, OutcomeSource, ReplaySource, ThreadRngSource};
pub use paytable::{GameResult, WinTier};
pub use player::Player;
pub use player_account::{DailyResults, PlayerAccount, PlayerStats};
pub use player_registry::PlayerRegistry;
