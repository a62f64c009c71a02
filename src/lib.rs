//! # slot-gateway
//!
//! REST service for a five-reel slot machine with an atomic player ledger.
//!
//! Each play debits a fixed bet, draws five symbols from a weighted
//! generator, classifies them against a fixed paytable, and credits any
//! payout. The balance, the game session, and the ledger entries change
//! together or not at all.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── GameService (service/)
//!     ├── OutcomeSource + paytable (domain/)
//!     │
//!     ├── PlayerRegistry (domain/)
//!     ├── ledger transitions (domain/)
//!     │
//!     └── LedgerStore: in-memory or PostgreSQL (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
