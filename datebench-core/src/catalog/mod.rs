// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The operation catalog: every benchmarked operation, defined exactly once.
//!
//! Each submodule declares a family of operations and registers one entry per
//! library that supports them. Libraries without a native API for an operation
//! are simply not registered for it.

mod format;
mod manipulate;
mod now;
mod parse;

use tracing::info;

use crate::config::Config;
use crate::error::DateBenchResult;
use crate::generator::InputGenerator;
use crate::inputs::SharedInputs;
use crate::registry::OperationRegistry;
use crate::types::{OperationFamily, OperationName, Projection};

pub const NOW_UTC: &str = "now_utc";
pub const NOW_LOCAL: &str = "now_local";
pub const PARSE_UTC_FROM_TIMESTAMP: &str = "parse_utc_from_timestamp";
pub const PARSE_UTC_FROM_ISO_8601: &str = "parse_utc_from_iso_8601";
pub const PARSE_DURATION_FROM_ISO_8601: &str = "parse_duration_from_iso_8601";
pub const PARSE_UTC_FROM_RFC_3339: &str = "parse_utc_from_rfc_3339";
pub const SHIFT_FORWARD: &str = "shift_forward";
pub const SHIFT_BACKWARD: &str = "shift_backward";
pub const DURATION_TO_SECONDS: &str = "duration_to_seconds";
pub const ISO_WEEKDAY: &str = "iso_weekday";
pub const FIND_NEXT_SATURDAY: &str = "find_next_saturday";
pub const FORMAT_ISO_8601: &str = "format_iso_8601";

/// Every operation name, in declaration order.
pub const OPERATION_NAMES: [&str; 12] = [
    NOW_UTC,
    NOW_LOCAL,
    PARSE_UTC_FROM_TIMESTAMP,
    PARSE_UTC_FROM_ISO_8601,
    PARSE_DURATION_FROM_ISO_8601,
    PARSE_UTC_FROM_RFC_3339,
    SHIFT_FORWARD,
    SHIFT_BACKWARD,
    DURATION_TO_SECONDS,
    ISO_WEEKDAY,
    FIND_NEXT_SATURDAY,
    FORMAT_ISO_8601,
];

/// Probe literal for the RFC 3339 equivalence check (day 19 at -08:00).
pub const RFC_3339_PROBE: &str = "1996-12-19T16:39:57-08:00";

/// Examples from RFC 3339 section 5.8, parsed together as one timed unit.
/// Leap-second examples are left out: none of the libraries accept them.
pub const RFC_3339_EXAMPLES: [&str; 3] = [
    "1985-04-12T23:20:50.52Z",
    "1996-12-19T16:39:57-08:00",
    "1937-01-01T12:00:27.87+00:20",
];

/// ISO 8601 duration of one day and twelve hours.
pub const ISO_8601_DURATION: &str = "P1DT12H";
/// The same duration in humantime's friendly syntax. humantime has no ISO 8601
/// duration parser, so its entry is timed on this spelling instead.
pub const HUMANTIME_DURATION: &str = "1day 12h";

/// Build the registry for one run.
///
/// Shared inputs are drawn from `generator` once; only libraries enabled in
/// `config` register entries. Every operation is declared regardless of the
/// operation filter so lookups by name stay valid.
pub fn build_registry(
    generator: &mut InputGenerator,
    config: &Config,
) -> DateBenchResult<OperationRegistry> {
    let inputs = SharedInputs::generate(generator);
    info!(
        seed = generator.seed(),
        instant = %inputs.instant,
        unix_time = inputs.unix_time,
        iso_8601 = %inputs.iso_8601,
        shift = ?inputs.shift,
        "Generated shared inputs"
    );

    let mut registry = OperationRegistry::with_libraries(config.libraries.iter().copied());
    now::define(&mut registry)?;
    parse::define(&mut registry, &inputs)?;
    manipulate::define(&mut registry, &inputs)?;
    format::define(&mut registry, &inputs)?;

    Ok(registry)
}

fn declare(
    registry: &mut OperationRegistry,
    name: &str,
    projection: Projection,
    family: OperationFamily,
    description: &'static str,
) -> DateBenchResult<()> {
    registry.declare(OperationName::new(name)?, projection, family, description)?;
    Ok(())
}
