// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Arithmetic on instants and durations, and weekday queries.

use chrono::{DateTime, Datelike, Utc};

use crate::error::DateBenchResult;
use crate::inputs::{InstantExt, SharedInputs};
use crate::registry::{LibraryEntry, OperationRegistry};
use crate::types::{Library, OperationFamily, Projection};

use super::{
    declare, DURATION_TO_SECONDS, FIND_NEXT_SATURDAY, ISO_WEEKDAY, SHIFT_BACKWARD, SHIFT_FORWARD,
};

/// Saturday counted from Monday = 0.
const SATURDAY_FROM_MONDAY: i64 = 5;

pub(super) fn define(registry: &mut OperationRegistry, inputs: &SharedInputs) -> DateBenchResult<()> {
    shift(registry, inputs, SHIFT_FORWARD, false)?;
    shift(registry, inputs, SHIFT_BACKWARD, true)?;
    duration_to_seconds(registry, inputs)?;
    iso_weekday(registry, inputs)?;
    find_next_saturday(registry, inputs)?;
    Ok(())
}

/// Shift the base instant by the shared amount, or by its negation.
fn shift(
    registry: &mut OperationRegistry,
    inputs: &SharedInputs,
    name: &str,
    backward: bool,
) -> DateBenchResult<()> {
    let description = if backward {
        "Subtract days, hours, minutes and microseconds from an instant"
    } else {
        "Add days, hours, minutes and microseconds to an instant"
    };
    declare(
        registry,
        name,
        Projection::DayOfMonth,
        OperationFamily::Manipulate,
        description,
    )?;

    let amount = if backward {
        inputs.shift.negated()
    } else {
        inputs.shift
    };

    let delta = amount.to_chrono();
    registry.register(
        name,
        LibraryEntry::new(Library::Chrono, inputs.instant, move |dt: &DateTime<Utc>| {
            dt.checked_add_signed(delta)
        }),
    )?;

    let delta = amount.to_time();
    registry.register(
        name,
        LibraryEntry::new(
            Library::Time,
            inputs.instant.to_time()?,
            move |dt: &time::OffsetDateTime| dt.checked_add(delta),
        ),
    )?;

    let delta = amount.to_jiff();
    registry.register(
        name,
        LibraryEntry::new(Library::Jiff, inputs.instant.to_jiff()?, move |zdt: &jiff::Zoned| {
            zdt.checked_add(delta)
        }),
    )?;

    // std durations are unsigned: the sign picks the method.
    let magnitude = amount.to_std();
    let negative = amount.is_negative();
    registry.register(
        name,
        LibraryEntry::new(
            Library::Std,
            inputs.instant.to_system_time()?,
            move |t: &std::time::SystemTime| {
                if negative {
                    t.checked_sub(magnitude)
                } else {
                    t.checked_add(magnitude)
                }
            },
        ),
    )?;

    Ok(())
}

fn duration_to_seconds(registry: &mut OperationRegistry, inputs: &SharedInputs) -> DateBenchResult<()> {
    declare(
        registry,
        DURATION_TO_SECONDS,
        Projection::TotalSeconds,
        OperationFamily::Manipulate,
        "Convert a duration to fractional seconds",
    )?;

    registry.register(
        DURATION_TO_SECONDS,
        LibraryEntry::new(Library::Chrono, inputs.shift.to_chrono(), |d: &chrono::TimeDelta| {
            d.num_seconds() as f64 + f64::from(d.subsec_nanos()) / 1_000_000_000.0
        }),
    )?;
    registry.register(
        DURATION_TO_SECONDS,
        LibraryEntry::new(Library::Time, inputs.shift.to_time(), |d: &time::Duration| {
            d.as_seconds_f64()
        }),
    )?;
    registry.register(
        DURATION_TO_SECONDS,
        LibraryEntry::new(Library::Jiff, inputs.shift.to_jiff(), |d: &jiff::SignedDuration| {
            d.as_secs_f64()
        }),
    )?;
    registry.register(
        DURATION_TO_SECONDS,
        LibraryEntry::new(Library::Std, inputs.shift.to_std(), |d: &std::time::Duration| {
            d.as_secs_f64()
        }),
    )?;

    Ok(())
}

fn iso_weekday(registry: &mut OperationRegistry, inputs: &SharedInputs) -> DateBenchResult<()> {
    declare(
        registry,
        ISO_WEEKDAY,
        Projection::IsoWeekday,
        OperationFamily::Manipulate,
        "ISO weekday number, Monday = 1",
    )?;

    registry.register(
        ISO_WEEKDAY,
        LibraryEntry::new(Library::Chrono, inputs.instant, |dt: &DateTime<Utc>| {
            dt.weekday().number_from_monday()
        }),
    )?;
    registry.register(
        ISO_WEEKDAY,
        LibraryEntry::new(Library::Time, inputs.instant.to_time()?, |dt: &time::OffsetDateTime| {
            dt.weekday().number_from_monday()
        }),
    )?;
    registry.register(
        ISO_WEEKDAY,
        LibraryEntry::new(Library::Jiff, inputs.instant.to_jiff()?, |zdt: &jiff::Zoned| {
            zdt.weekday().to_monday_one_offset()
        }),
    )?;

    Ok(())
}

fn find_next_saturday(registry: &mut OperationRegistry, inputs: &SharedInputs) -> DateBenchResult<()> {
    declare(
        registry,
        FIND_NEXT_SATURDAY,
        Projection::DayOfMonth,
        OperationFamily::Manipulate,
        "First Saturday strictly after an instant",
    )?;

    registry.register(
        FIND_NEXT_SATURDAY,
        LibraryEntry::new(Library::Chrono, inputs.instant, chrono_next_saturday),
    )?;
    registry.register(
        FIND_NEXT_SATURDAY,
        LibraryEntry::new(Library::Time, inputs.instant.to_time()?, |dt: &time::OffsetDateTime| {
            dt.replace_date(dt.date().next_occurrence(time::Weekday::Saturday))
        }),
    )?;
    registry.register(
        FIND_NEXT_SATURDAY,
        LibraryEntry::new(Library::Jiff, inputs.instant.to_jiff()?, |zdt: &jiff::Zoned| {
            zdt.nth_weekday(1, jiff::civil::Weekday::Saturday)
        }),
    )?;

    Ok(())
}

fn chrono_next_saturday(dt: &DateTime<Utc>) -> Option<DateTime<Utc>> {
    let from_monday = i64::from(dt.weekday().num_days_from_monday());
    // A Saturday input moves a full week ahead.
    let days = (SATURDAY_FROM_MONDAY - from_monday - 1).rem_euclid(7) + 1;
    dt.checked_add_days(chrono::Days::new(days.unsigned_abs()))
}
