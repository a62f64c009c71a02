//! Outcome generation: the five symbols shown after one spin.
//!
//! A spin first picks a [`DrawCategory`] from a uniform draw over
//! [`BUCKETS`] discrete buckets, then builds a sequence with that category's
//! shape. The open category (94% of buckets) draws five independent symbols,
//! so it may incidentally land on a paying shape.
//!
//! Raw draws are always passed through [`Outcome::from_raw`] before they reach
//! the classifier: anything malformed collapses to [`Outcome::NEUTRAL`].

use std::fmt;
use std::ops::Range;
use std::sync::Mutex;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Number of reels, i.e. symbols per outcome.
pub const REEL_COUNT: usize = 5;

/// Lowest symbol value.
pub const MIN_SYMBOL: u8 = 1;

/// Highest symbol value.
pub const MAX_SYMBOL: u8 = 7;

/// Size of the uniform draw used to pick a [`DrawCategory`].
pub const BUCKETS: u32 = 1000;

/// Reasons a raw draw cannot be used as an [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedOutcome {
    /// The draw did not contain exactly [`REEL_COUNT`] symbols.
    #[error("expected 5 symbols, got {0}")]
    WrongLength(usize),
    /// A symbol fell outside `MIN_SYMBOL..=MAX_SYMBOL`.
    #[error("symbol {0} outside 1..=7")]
    SymbolOutOfRange(u8),
}

/// A validated sequence of five symbols, each in `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outcome([u8; REEL_COUNT]);

impl Outcome {
    /// Sequence substituted for any malformed draw, and shown before a
    /// player's first spin.
    pub const NEUTRAL: Self = Self([MAX_SYMBOL; REEL_COUNT]);

    /// Validates a five-symbol array.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedOutcome::SymbolOutOfRange`] for the first symbol
    /// outside `1..=7`.
    pub fn new(symbols: [u8; REEL_COUNT]) -> Result<Self, MalformedOutcome> {
        if let Some(bad) = symbols
            .iter()
            .copied()
            .find(|s| !(MIN_SYMBOL..=MAX_SYMBOL).contains(s))
        {
            return Err(MalformedOutcome::SymbolOutOfRange(bad));
        }
        Ok(Self(symbols))
    }

    /// Validates a raw slice of symbols.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedOutcome`] if the slice has the wrong length or
    /// carries an out-of-range symbol.
    pub fn try_from_slice(raw: &[u8]) -> Result<Self, MalformedOutcome> {
        let symbols: [u8; REEL_COUNT] = raw
            .try_into()
            .map_err(|_| MalformedOutcome::WrongLength(raw.len()))?;
        Self::new(symbols)
    }

    /// Converts a raw draw into an outcome, substituting [`Self::NEUTRAL`]
    /// when the draw is malformed. The anomaly is logged, never returned.
    #[must_use]
    pub fn from_raw(raw: &[u8]) -> Self {
        match Self::try_from_slice(raw) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, ?raw, "malformed outcome replaced with neutral sequence");
                Self::NEUTRAL
            }
        }
    }

    /// Returns the symbols in reel order.
    #[must_use]
    pub const fn symbols(&self) -> [u8; REEL_COUNT] {
        self.0
    }

    /// Returns how often each distinct symbol occurs, largest first.
    ///
    /// `[2, 2, 5, 5, 1]` has shape `[2, 2, 1]`.
    #[must_use]
    pub fn shape(&self) -> Vec<u8> {
        let mut counts = [0u8; MAX_SYMBOL as usize + 1];
        for symbol in self.0 {
            if let Some(count) = counts.get_mut(usize::from(symbol)) {
                *count += 1;
            }
        }
        let mut shape: Vec<u8> = counts.into_iter().filter(|c| *c > 0).collect();
        shape.sort_unstable_by(|a, b| b.cmp(a));
        shape
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.0;
        write!(f, "[{a}, {b}, {c}, {d}, {e}]")
    }
}

/// Shape forced onto a spin by the bucket draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawCategory {
    /// One symbol five times.
    Jackpot,
    /// One symbol four times plus a different one.
    FourOfAKind,
    /// One symbol three times plus two further distinct symbols.
    ThreeOfAKind,
    /// Two pairs and a singleton, laid out from three free draws.
    ThreeGroups,
    /// One symbol three times plus a different symbol twice.
    TwoGroups,
    /// Five independent symbols.
    Open,
}

impl DrawCategory {
    /// All categories in bucket order.
    pub const ALL: [Self; 6] = [
        Self::Jackpot,
        Self::FourOfAKind,
        Self::ThreeOfAKind,
        Self::ThreeGroups,
        Self::TwoGroups,
        Self::Open,
    ];

    /// Bucket range (out of [`BUCKETS`]) mapped to this category.
    #[must_use]
    pub const fn buckets(self) -> Range<u32> {
        match self {
            Self::Jackpot => 0..1,
            Self::FourOfAKind => 1..10,
            Self::ThreeOfAKind => 10..40,
            Self::ThreeGroups => 40..50,
            Self::TwoGroups => 50..60,
            Self::Open => 60..BUCKETS,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jackpot => "jackpot",
            Self::FourOfAKind => "four_of_a_kind",
            Self::ThreeOfAKind => "three_of_a_kind",
            Self::ThreeGroups => "three_groups",
            Self::TwoGroups => "two_groups",
            Self::Open => "open",
        }
    }

    /// Maps a bucket in `0..BUCKETS` to its category. Buckets past the end
    /// fall into [`Self::Open`].
    #[must_use]
    pub fn from_bucket(bucket: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.buckets().contains(&bucket))
            .unwrap_or(Self::Open)
    }
}

/// Draws a raw five-symbol sequence from `rng`.
///
/// The result is unvalidated by type; callers feed it through
/// [`Outcome::from_raw`].
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    let category = DrawCategory::from_bucket(rng.gen_range(0..BUCKETS));
    build(category, rng)
}

/// Builds a raw sequence with the shape of `category`.
pub fn build<R: Rng + ?Sized>(category: DrawCategory, rng: &mut R) -> Vec<u8> {
    let mut symbols = match category {
        DrawCategory::Jackpot => vec![symbol(rng); REEL_COUNT],
        DrawCategory::FourOfAKind => {
            let main = symbol(rng);
            let mut seq = vec![main; 4];
            seq.extend(others(rng, main, 1));
            seq
        }
        DrawCategory::ThreeOfAKind => {
            let main = symbol(rng);
            let mut seq = vec![main; 3];
            seq.extend(others(rng, main, 2));
            seq
        }
        DrawCategory::ThreeGroups => {
            let (a, b, c) = (symbol(rng), symbol(rng), symbol(rng));
            vec![a, b, a, b, c]
        }
        DrawCategory::TwoGroups => {
            let main = symbol(rng);
            let mut seq = vec![main; 3];
            for pair in others(rng, main, 1) {
                seq.extend([pair, pair]);
            }
            seq
        }
        DrawCategory::Open => return (0..REEL_COUNT).map(|_| symbol(rng)).collect(),
    };
    symbols.shuffle(rng);
    symbols
}

fn symbol<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(MIN_SYMBOL..=MAX_SYMBOL)
}

/// Picks `n` distinct symbols, none equal to `excluded`.
fn others<R: Rng + ?Sized>(rng: &mut R, excluded: u8, n: usize) -> Vec<u8> {
    let candidates: Vec<u8> = (MIN_SYMBOL..=MAX_SYMBOL)
        .filter(|s| *s != excluded)
        .collect();
    candidates.choose_multiple(rng, n).copied().collect()
}

/// Source of raw draws used by the play operation.
pub trait OutcomeSource: Send + Sync + fmt::Debug {
    /// Produces one raw draw.
    fn draw(&self) -> Vec<u8>;
}

/// Draws from the thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl OutcomeSource for ThreadRngSource {
    fn draw(&self) -> Vec<u8> {
        generate(&mut rand::thread_rng())
    }
}

/// Replays a fixed list of raw draws in order, cycling when exhausted.
///
/// Used to reproduce recorded spins.
#[derive(Debug)]
pub struct ReplaySource {
    draws: Vec<Vec<u8>>,
    cursor: Mutex<usize>,
}

impl ReplaySource {
    /// Creates a source that replays `draws`.
    #[must_use]
    pub fn new(draws: Vec<Vec<u8>>) -> Self {
        Self {
            draws,
            cursor: Mutex::new(0),
        }
    }
}

impl OutcomeSource for ReplaySource {
    fn draw(&self) -> Vec<u8> {
        if self.draws.is_empty() {
            return Vec::new();
        }
        let mut cursor = match self.cursor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let draw = self
            .draws
            .get(*cursor % self.draws.len())
            .cloned()
            .unwrap_or_default();
        *cursor = cursor.wrapping_add(1);
        draw
    }
}
