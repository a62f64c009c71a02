//! Service layer: business logic orchestration.
//!
//! [`GameService`] coordinates plays and balance adjustments, draws outcomes
//! from an [`crate::domain::OutcomeSource`], and commits every ledger change
//! through the [`crate::persistence::LedgerStore`].

pub mod game_service;

pub use game_service::{GameService, Page, PlayReceipt};
