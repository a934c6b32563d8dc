//! Injectable generation context.
//!
//! Every planner draws randomness and the notion of "now" from a
//! [`GenerationContext`] passed in by the caller, so a run is reproducible from
//! its seed and reference instant alone.

use std::ops::RangeInclusive;

use chrono::{NaiveDateTime, TimeDelta};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Days in a relative "year" offset such as `-2y`.
const DAYS_PER_YEAR: i64 = 365;

/// Days in a relative "month" offset such as `-6m`.
const DAYS_PER_MONTH: i64 = 30;

/// Returns a span of `count` relative years (365 days each).
#[must_use]
pub fn years(count: i64) -> TimeDelta {
    days(count.saturating_mul(DAYS_PER_YEAR))
}

/// Returns a span of `count` relative months (30 days each).
#[must_use]
pub fn months(count: i64) -> TimeDelta {
    days(count.saturating_mul(DAYS_PER_MONTH))
}

fn days(count: i64) -> TimeDelta {
    TimeDelta::try_days(count).unwrap_or(TimeDelta::MAX)
}

/// Seeded randomness plus a fixed reference instant.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use lms_data::GenerationContext;
///
/// let now = NaiveDate::from_ymd_opt(2024, 5, 1)
///     .and_then(|date| date.and_hms_opt(12, 0, 0))
///     .expect("valid timestamp");
/// let mut first = GenerationContext::new(7, now);
/// let mut second = GenerationContext::new(7, now);
///
/// assert_eq!(first.count_in(1..=10), second.count_in(1..=10));
/// ```
#[derive(Debug, Clone)]
pub struct GenerationContext {
    rng: ChaCha8Rng,
    seed: u64,
    now: NaiveDateTime,
}

impl GenerationContext {
    /// Creates a context from an RNG seed and the instant treated as "now".
    #[must_use]
    pub fn new(seed: u64, now: NaiveDateTime) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            now,
        }
    }

    /// Returns the seed this context was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the reference instant.
    #[must_use]
    pub const fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Draws a timestamp uniformly from `[start, end]` at second granularity.
    ///
    /// An empty or inverted interval collapses to `start`.
    pub fn datetime_between(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
        let span = end.signed_duration_since(start).num_seconds();
        if span <= 0 {
            return start;
        }
        let offset = self.rng.random_range(0..=span);
        TimeDelta::try_seconds(offset)
            .and_then(|delta| start.checked_add_signed(delta))
            .unwrap_or(end)
    }

    /// Draws a timestamp uniformly from `[now - span, now]`.
    pub fn datetime_within(&mut self, span: TimeDelta) -> NaiveDateTime {
        let start = self
            .now
            .checked_sub_signed(span)
            .unwrap_or(NaiveDateTime::MIN);
        self.datetime_between(start, self.now)
    }

    /// Draws a timestamp uniformly from `[start, now]`.
    pub fn datetime_until_now(&mut self, start: NaiveDateTime) -> NaiveDateTime {
        self.datetime_between(start, self.now)
    }

    /// Draws a count uniformly from an inclusive range.
    ///
    /// An empty range yields its lower bound.
    pub fn count_in(&mut self, range: RangeInclusive<usize>) -> usize {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.random_range(range)
    }

    /// Returns `true` or `false` with equal probability.
    pub fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Returns `true` with probability `numerator / denominator`.
    pub fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        if denominator == 0 || numerator >= denominator {
            return denominator != 0;
        }
        self.rng.random_ratio(numerator, denominator)
    }

    /// Picks one item uniformly, or `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Samples `amount` distinct items without replacement.
    ///
    /// Returns every item (in random order) when `amount` exceeds the slice.
    pub fn sample<T: Clone>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.rng, amount)
            .cloned()
            .collect()
    }

    /// Draws a difficulty level uniformly from 1 to 5.
    pub fn difficulty(&mut self) -> i32 {
        self.rng.random_range(1..=5)
    }

    /// Draws a test score uniformly from 0 to 100.
    pub fn score(&mut self) -> f64 {
        self.rng.random_range(0.0..=100.0)
    }

    /// Exposes the RNG for faker providers.
    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}
