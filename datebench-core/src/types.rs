// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers and small enums shared by the registry and the runners.
//!
//! Following the "Newtype" pattern: identifiers validate their invariants at
//! creation time, so a registry never holds a malformed operation name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Maximum length of an operation name.
const MAX_OPERATION_NAME_LEN: usize = 64;

/// A date/time library under test.
///
/// The identifier is the crate name (`std` for the standard library).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Library {
    Chrono,
    Time,
    Jiff,
    Std,
    Humantime,
}

impl Library {
    /// Every library, in report order.
    pub const ALL: [Library; 5] = [
        Library::Chrono,
        Library::Time,
        Library::Jiff,
        Library::Std,
        Library::Humantime,
    ];

    /// Library identifier as used in case names and config files.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Chrono => "chrono",
            Self::Time => "time",
            Self::Jiff => "jiff",
            Self::Std => "std",
            Self::Humantime => "humantime",
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Library {
    type Err = HardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Library::ALL
            .into_iter()
            .find(|lib| lib.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| HardValidationError::UnknownLibrary {
                name: s.to_string(),
            })
    }
}

/// Validated operation identifier, e.g. `parse_utc_from_iso_8601`.
/// Must be non-empty snake_case (lowercase ASCII, digits, underscores), max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperationName(String);

impl OperationName {
    /// Create a new OperationName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, HardValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "operation",
                value: name,
                reason: "Operation name cannot be empty".to_string(),
            });
        }

        if name.len() > MAX_OPERATION_NAME_LEN {
            return Err(HardValidationError::InvalidFieldValue {
                field: "operation",
                value: name.clone(),
                reason: format!(
                    "Operation name too long: {} chars (max {})",
                    name.len(),
                    MAX_OPERATION_NAME_LEN
                ),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "operation",
                value: name,
                reason: "Operation name must be snake_case (a-z, 0-9, _)".to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OperationName {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for OperationName {
    type Error = HardValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OperationName> for String {
    fn from(name: OperationName) -> Self {
        name.0
    }
}

/// Coarse grouping of operations, used to split benches and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationFamily {
    /// Reading the clock.
    Now,
    /// Text or numeric input to a native value.
    Parse,
    /// Arithmetic and calendar queries.
    Manipulate,
    /// Native value to text.
    Format,
}

impl OperationFamily {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Now => "now",
            Self::Parse => "parse",
            Self::Manipulate => "manipulate",
            Self::Format => "format",
        }
    }
}

impl fmt::Display for OperationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reduction applied to a library-native result to make it comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Day of the month, 1-31, in the value's own offset.
    DayOfMonth,
    /// Hour of the day, 0-23, in the value's own offset.
    HourOfDay,
    /// ISO weekday number, Monday = 1 ... Sunday = 7.
    IsoWeekday,
    /// Length of a duration in (fractional) seconds.
    TotalSeconds,
    /// Length of a rendered string in bytes.
    Length,
}

impl Projection {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DayOfMonth => "day_of_month",
            Self::HourOfDay => "hour_of_day",
            Self::IsoWeekday => "iso_weekday",
            Self::TotalSeconds => "total_seconds",
            Self::Length => "length",
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A projected, comparable value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Projected {
    Integer(i64),
    Seconds(f64),
}

impl fmt::Display for Projected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Seconds(v) => write!(f, "{}s", v),
        }
    }
}
