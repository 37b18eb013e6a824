// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Generated inputs and their library-native equivalents.
//!
//! Values are drawn once from an [`InputGenerator`] and then converted into
//! each library's own representation, so every library works on the same
//! logical instant or duration.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{DateBenchError, DateBenchResult};
use crate::generator::{InputGenerator, ShiftAmount};
use crate::types::Library;

/// Inputs shared by every operation of one registry.
#[derive(Debug, Clone)]
pub struct SharedInputs {
    /// Base instant for manipulate/format operations.
    pub instant: DateTime<Utc>,
    /// Whole-second timestamp for `parse_utc_from_timestamp`.
    pub unix_time: i64,
    /// `+00:00`-suffixed ISO 8601 text for `parse_utc_from_iso_8601`.
    pub iso_8601: String,
    /// Positive shift for the manipulate operations.
    pub shift: ShiftAmount,
}

impl SharedInputs {
    /// Draw every shared input from the generator, in a fixed order.
    pub fn generate(generator: &mut InputGenerator) -> Self {
        Self {
            instant: generator.instant(),
            unix_time: generator.unix_time(),
            iso_8601: generator.iso8601(),
            shift: generator.shift_amount(),
        }
    }

    /// The ISO 8601 input with a `Z` designator in place of `+00:00`.
    pub fn iso_8601_zulu(&self) -> String {
        match self.iso_8601.strip_suffix("+00:00") {
            Some(prefix) => format!("{}Z", prefix),
            None => self.iso_8601.clone(),
        }
    }
}

fn conversion_error(library: Library, err: impl std::fmt::Display) -> DateBenchError {
    DateBenchError::InputConversion {
        library,
        message: err.to_string(),
    }
}

/// Conversions of a chrono UTC instant into the other libraries' types.
pub trait InstantExt {
    fn to_time(&self) -> DateBenchResult<time::OffsetDateTime>;
    fn to_jiff(&self) -> DateBenchResult<jiff::Zoned>;
    fn to_system_time(&self) -> DateBenchResult<SystemTime>;
}

impl InstantExt for DateTime<Utc> {
    fn to_time(&self) -> DateBenchResult<time::OffsetDateTime> {
        let nanos = i128::from(self.timestamp()) * 1_000_000_000
            + i128::from(self.timestamp_subsec_nanos());
        time::OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|e| conversion_error(Library::Time, e))
    }

    fn to_jiff(&self) -> DateBenchResult<jiff::Zoned> {
        let nanos = i32::try_from(self.timestamp_subsec_nanos())
            .map_err(|e| conversion_error(Library::Jiff, e))?;
        let ts = jiff::Timestamp::new(self.timestamp(), nanos)
            .map_err(|e| conversion_error(Library::Jiff, e))?;
        Ok(ts.to_zoned(jiff::tz::TimeZone::UTC))
    }

    fn to_system_time(&self) -> DateBenchResult<SystemTime> {
        let secs = u64::try_from(self.timestamp()).map_err(|_| {
            conversion_error(Library::Std, format!("{} is before the UNIX epoch", self))
        })?;
        Ok(UNIX_EPOCH + Duration::new(secs, self.timestamp_subsec_nanos()))
    }
}

impl ShiftAmount {
    pub fn to_chrono(&self) -> TimeDelta {
        TimeDelta::days(self.days)
            + TimeDelta::hours(self.hours)
            + TimeDelta::minutes(self.minutes)
            + TimeDelta::microseconds(self.microseconds)
    }

    pub fn to_time(&self) -> time::Duration {
        time::Duration::days(self.days)
            + time::Duration::hours(self.hours)
            + time::Duration::minutes(self.minutes)
            + time::Duration::microseconds(self.microseconds)
    }

    pub fn to_jiff(&self) -> jiff::SignedDuration {
        jiff::SignedDuration::from_micros(self.total_microseconds())
    }

    /// Magnitude as a std duration; std durations carry no sign.
    pub fn to_std(&self) -> Duration {
        Duration::from_micros(self.total_microseconds().unsigned_abs())
    }
}
