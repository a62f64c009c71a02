//! Currency helpers.
//!
//! All money is carried as [`rust_decimal::Decimal`] with two fractional
//! digits. Every computation that produces a currency value goes through
//! [`round_currency`], which rounds half-up (away from zero on a tie).

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Number of fractional digits carried by every currency value.
pub const CURRENCY_SCALE: u32 = 2;

/// Fixed bet placed by one play unless configured otherwise.
pub const DEFAULT_MIN_BET: Decimal = dec!(5.00);

/// Balance credited to a freshly registered player.
pub const DEFAULT_SEED_BALANCE: Decimal = dec!(1000.00);

/// Exclusive upper bound on any stored amount or balance (`NUMERIC(12, 2)`).
pub const MAX_AMOUNT: Decimal = dec!(10000000000);

/// Rounds `value` to [`CURRENCY_SCALE`] digits using round-half-up and pads
/// the result so it always prints with exactly two decimals.
#[must_use]
pub fn round_currency(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}
