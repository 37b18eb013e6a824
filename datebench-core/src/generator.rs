// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Seedable generator for randomized benchmark inputs.
//!
//! One generator instance is passed into registry construction. Every value it
//! produces is captured once and shared by all libraries of an operation, so
//! the equivalence check compares the same logical instant in different
//! representations. The seed is always known, which makes any run
//! reproducible.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 2000-01-01T00:00:00Z
pub const MIN_UNIX_TIME: i64 = 946_684_800;
/// 2038-01-19T03:14:07Z, the last second a signed 32-bit `time_t` can hold.
pub const MAX_UNIX_TIME: i64 = 2_147_483_647;

/// Bounds for every component of a generated [`ShiftAmount`].
pub const SHIFT_COMPONENT_MIN: i64 = 400;
pub const SHIFT_COMPONENT_MAX: i64 = 500;

/// A calendar-free duration expressed as separate components.
///
/// Components share a sign; `negated()` flips all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftAmount {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub microseconds: i64,
}

impl ShiftAmount {
    pub fn negated(&self) -> Self {
        Self {
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            microseconds: -self.microseconds,
        }
    }

    /// Whole duration in microseconds. Days are 24 hours.
    pub fn total_microseconds(&self) -> i64 {
        ((self.days * 24 + self.hours) * 60 + self.minutes) * 60_000_000 + self.microseconds
    }

    pub fn is_negative(&self) -> bool {
        self.total_microseconds() < 0
    }
}

/// Seeded pseudo-random input source.
#[derive(Debug, Clone)]
pub struct InputGenerator {
    seed: u64,
    rng: StdRng,
}

impl InputGenerator {
    /// Create a generator with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator with a seed drawn from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Use `seed` when given, otherwise draw one.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map(Self::new).unwrap_or_else(Self::from_entropy)
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random integer in `min..=max`.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    /// Random UNIX timestamp in whole seconds.
    pub fn unix_time(&mut self) -> i64 {
        self.int(MIN_UNIX_TIME, MAX_UNIX_TIME)
    }

    /// Random UTC instant with microsecond precision.
    pub fn instant(&mut self) -> DateTime<Utc> {
        let micros = self.unix_time() * 1_000_000 + self.int(0, 999_999);
        DateTime::from_timestamp_micros(micros).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Random ISO 8601 string with an explicit `+00:00` offset and whole seconds,
    /// e.g. `2003-09-15T07:21:47+00:00`.
    pub fn iso8601(&mut self) -> String {
        let secs = self.unix_time();
        DateTime::from_timestamp(secs, 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// Random positive shift with every component in 400..=500.
    pub fn shift_amount(&mut self) -> ShiftAmount {
        ShiftAmount {
            days: self.int(SHIFT_COMPONENT_MIN, SHIFT_COMPONENT_MAX),
            hours: self.int(SHIFT_COMPONENT_MIN, SHIFT_COMPONENT_MAX),
            minutes: self.int(SHIFT_COMPONENT_MIN, SHIFT_COMPONENT_MAX),
            microseconds: self.int(SHIFT_COMPONENT_MIN, SHIFT_COMPONENT_MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let mut a = InputGenerator::new(7);
        let mut b = InputGenerator::new(7);

        assert_eq!(a.unix_time(), b.unix_time());
        assert_eq!(a.instant(), b.instant());
        assert_eq!(a.iso8601(), b.iso8601());
        assert_eq!(a.shift_amount(), b.shift_amount());
    }

    #[test]
    fn test_bounds() {
        let mut generator = InputGenerator::new(42);
        for _ in 0..1000 {
            let ts = generator.unix_time();
            assert!((MIN_UNIX_TIME..=MAX_UNIX_TIME).contains(&ts));

            let shift = generator.shift_amount();
            for component in [shift.days, shift.hours, shift.minutes, shift.microseconds] {
                assert!((SHIFT_COMPONENT_MIN..=SHIFT_COMPONENT_MAX).contains(&component));
            }
        }
    }

    #[test]
    fn test_iso8601_shape() {
        let mut generator = InputGenerator::new(3);
        let text = generator.iso8601();
        assert_eq!(text.len(), "2003-09-15T07:21:47+00:00".len());
        assert!(text.ends_with("+00:00"));
        assert_eq!(&text[10..11], "T");
    }

    #[test]
    fn test_shift_amount_total() {
        let shift = ShiftAmount {
            days: 1,
            hours: 1,
            minutes: 1,
            microseconds: 1,
        };
        assert_eq!(shift.total_microseconds(), 90_060_000_001);
        assert_eq!(shift.negated().total_microseconds(), -90_060_000_001);
        assert!(shift.negated().is_negative());
    }

    #[test]
    fn test_seed_is_reported() {
        let generator = InputGenerator::from_optional_seed(Some(99));
        assert_eq!(generator.seed(), 99);
    }
}
