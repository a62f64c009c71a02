//! Fixed paytable: outcome classification and payout computation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::money::round_currency;
use super::outcome::Outcome;

/// Payout category of an outcome. Exactly one tier matches any outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WinTier {
    /// All five symbols equal.
    Jackpot,
    /// Four of one symbol plus a different one.
    FourOfAKind,
    /// Exactly three of one symbol, the other two different from each other.
    ThreeOfAKind,
    /// Two pairs and a singleton (2+2+1).
    ThreeGroups,
    /// A triple and a pair (3+2).
    TwoGroups,
    /// No paying pattern.
    Loss,
}

/// Externally visible result of one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameResult {
    /// Nothing paid.
    Loss,
    /// A non-jackpot tier paid.
    Win,
    /// The jackpot tier paid.
    Jackpot,
}

impl GameResult {
    /// Returns the stored string form (`"LOSS"`, `"WIN"`, `"JACKPOT"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loss => "LOSS",
            Self::Win => "WIN",
            Self::Jackpot => "JACKPOT",
        }
    }

    /// Parses the stored string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOSS" => Some(Self::Loss),
            "WIN" => Some(Self::Win),
            "JACKPOT" => Some(Self::Jackpot),
            _ => None,
        }
    }
}

impl WinTier {
    /// Tiers in evaluation priority order.
    pub const PRIORITY: [Self; 6] = [
        Self::Jackpot,
        Self::FourOfAKind,
        Self::ThreeOfAKind,
        Self::ThreeGroups,
        Self::TwoGroups,
        Self::Loss,
    ];

    /// Classifies `outcome` by evaluating tiers in [`Self::PRIORITY`] order
    /// and returning the first match.
    #[must_use]
    pub fn classify(outcome: &Outcome) -> Self {
        let shape = outcome.shape();
        Self::PRIORITY
            .into_iter()
            .find(|tier| tier.matches(&shape))
            .unwrap_or(Self::Loss)
    }

    /// Whether an outcome with the given count shape (largest first) belongs
    /// to this tier, ignoring higher-priority tiers.
    fn matches(self, shape: &[u8]) -> bool {
        match self {
            Self::Jackpot => shape == [5],
            Self::FourOfAKind => shape == [4, 1],
            // A triple with a pair on the side is the 3+2 tier, not this one.
            Self::ThreeOfAKind => shape == [3, 1, 1],
            Self::ThreeGroups => shape == [2, 2, 1],
            Self::TwoGroups => shape == [3, 2],
            Self::Loss => true,
        }
    }

    /// Payout multiplier applied to the bet.
    #[must_use]
    pub const fn multiplier(self) -> Decimal {
        match self {
            Self::Jackpot => dec!(20.00),
            Self::FourOfAKind => dec!(4.00),
            Self::ThreeOfAKind => dec!(1.50),
            Self::ThreeGroups => dec!(2.50),
            Self::TwoGroups => dec!(1.00),
            Self::Loss => dec!(0.00),
        }
    }

    /// Win amount for `bet`, rounded half-up to two decimals. `None` if the
    /// product overflows.
    #[must_use]
    pub fn payout(self, bet: Decimal) -> Option<Decimal> {
        bet.checked_mul(self.multiplier()).map(round_currency)
    }

    /// Session result recorded for this tier.
    #[must_use]
    pub const fn result(self) -> GameResult {
        match self {
            Self::Jackpot => GameResult::Jackpot,
            Self::Loss => GameResult::Loss,
            Self::FourOfAKind | Self::ThreeOfAKind | Self::ThreeGroups | Self::TwoGroups => {
                GameResult::Win
            }
        }
    }
}
