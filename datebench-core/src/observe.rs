// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Projections of library-native results onto comparable values.
//!
//! Each native result type knows how to produce the projections that make
//! sense for it. Asking for one it cannot produce (e.g. the day of a string)
//! is a registry configuration bug and is reported as
//! [`ObserveFailure::Unsupported`].

use std::time::{Duration, SystemTime};

use chrono::{Datelike, Timelike};

use crate::types::{Projected, Projection};

/// Why a result could not be projected.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserveFailure {
    /// The library call itself failed (parse error, overflow, ...).
    Failed(String),
    /// The result type has no such projection.
    Unsupported { type_name: &'static str },
}

/// A library-native result that can be reduced to a [`Projected`] value.
pub trait Observe {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure>;
}

fn unsupported<T>(type_name: &'static str) -> Result<T, ObserveFailure> {
    Err(ObserveFailure::Unsupported { type_name })
}

impl<Tz: chrono::TimeZone> Observe for chrono::DateTime<Tz> {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::DayOfMonth => Ok(Projected::Integer(self.day().into())),
            Projection::HourOfDay => Ok(Projected::Integer(self.hour().into())),
            Projection::IsoWeekday => Ok(Projected::Integer(
                self.weekday().number_from_monday().into(),
            )),
            _ => unsupported("chrono::DateTime"),
        }
    }
}

impl Observe for chrono::TimeDelta {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::TotalSeconds => Ok(Projected::Seconds(
                self.num_seconds() as f64 + f64::from(self.subsec_nanos()) / 1_000_000_000.0,
            )),
            _ => unsupported("chrono::TimeDelta"),
        }
    }
}

impl Observe for time::OffsetDateTime {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::DayOfMonth => Ok(Projected::Integer(self.day().into())),
            Projection::HourOfDay => Ok(Projected::Integer(self.hour().into())),
            Projection::IsoWeekday => Ok(Projected::Integer(
                self.weekday().number_from_monday().into(),
            )),
            _ => unsupported("time::OffsetDateTime"),
        }
    }
}

impl Observe for time::Duration {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::TotalSeconds => Ok(Projected::Seconds(self.as_seconds_f64())),
            _ => unsupported("time::Duration"),
        }
    }
}

impl Observe for jiff::Zoned {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::DayOfMonth => Ok(Projected::Integer(self.day().into())),
            Projection::HourOfDay => Ok(Projected::Integer(self.hour().into())),
            Projection::IsoWeekday => Ok(Projected::Integer(
                self.weekday().to_monday_one_offset().into(),
            )),
            _ => unsupported("jiff::Zoned"),
        }
    }
}

/// Timestamps carry no civil fields; they are read in UTC.
impl Observe for jiff::Timestamp {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::DayOfMonth | Projection::HourOfDay | Projection::IsoWeekday => self
                .to_zoned(jiff::tz::TimeZone::UTC)
                .observe(projection),
            _ => unsupported("jiff::Timestamp"),
        }
    }
}

impl Observe for jiff::SignedDuration {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::TotalSeconds => Ok(Projected::Seconds(self.as_secs_f64())),
            _ => unsupported("jiff::SignedDuration"),
        }
    }
}

/// Read in UTC through jiff, outside any timed section.
impl Observe for SystemTime {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::DayOfMonth | Projection::HourOfDay | Projection::IsoWeekday => {
                jiff::Timestamp::try_from(*self)
                    .map_err(|e| ObserveFailure::Failed(e.to_string()))?
                    .observe(projection)
            }
            _ => unsupported("std::time::SystemTime"),
        }
    }
}

impl Observe for Duration {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::TotalSeconds => Ok(Projected::Seconds(self.as_secs_f64())),
            _ => unsupported("std::time::Duration"),
        }
    }
}

impl Observe for f64 {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::TotalSeconds => Ok(Projected::Seconds(*self)),
            _ => unsupported("f64"),
        }
    }
}

impl Observe for String {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match projection {
            Projection::Length => Ok(Projected::Integer(self.len() as i64)),
            _ => unsupported("String"),
        }
    }
}

/// Plain integers are already projected (weekday numbers, day numbers).
macro_rules! observe_scalar {
    ($($ty:ty),*) => {
        $(
            impl Observe for $ty {
                fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
                    match projection {
                        Projection::DayOfMonth
                        | Projection::HourOfDay
                        | Projection::IsoWeekday => Ok(Projected::Integer(i64::from(*self))),
                        _ => unsupported(stringify!($ty)),
                    }
                }
            }
        )*
    };
}

observe_scalar!(i8, u8, u32);

impl<T: Observe> Observe for Option<T> {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match self {
            Some(value) => value.observe(projection),
            None => Err(ObserveFailure::Failed("no value returned".to_string())),
        }
    }
}

impl<T: Observe, E: std::fmt::Display> Observe for Result<T, E> {
    fn observe(&self, projection: Projection) -> Result<Projected, ObserveFailure> {
        match self {
            Ok(value) => value.observe(projection),
            Err(e) => Err(ObserveFailure::Failed(e.to_string())),
        }
    }
}
