// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Rendering instants as ISO 8601 text.

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use jiff::fmt::temporal::DateTimePrinter;

use crate::error::DateBenchResult;
use crate::inputs::{InstantExt, SharedInputs};
use crate::registry::{LibraryEntry, OperationRegistry};
use crate::types::{Library, OperationFamily, Projection};

use super::{declare, FORMAT_ISO_8601};

static JIFF_PRINTER: DateTimePrinter = DateTimePrinter::new().precision(Some(6));

pub(super) fn define(registry: &mut OperationRegistry, inputs: &SharedInputs) -> DateBenchResult<()> {
    declare(
        registry,
        FORMAT_ISO_8601,
        Projection::Length,
        OperationFamily::Format,
        "Render a UTC instant with microseconds and a Z designator",
    )?;

    registry.register(
        FORMAT_ISO_8601,
        LibraryEntry::new(Library::Chrono, inputs.instant, |dt: &DateTime<Utc>| {
            dt.to_rfc3339_opts(SecondsFormat::Micros, true)
        }),
    )?;

    let micros_zulu = time::macros::format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
    );
    registry.register(
        FORMAT_ISO_8601,
        LibraryEntry::new(
            Library::Time,
            inputs.instant.to_time()?,
            move |dt: &time::OffsetDateTime| dt.format(micros_zulu),
        ),
    )?;

    registry.register(
        FORMAT_ISO_8601,
        LibraryEntry::new(
            Library::Jiff,
            inputs.instant.to_jiff()?.timestamp(),
            jiff_format,
        ),
    )?;

    registry.register(
        FORMAT_ISO_8601,
        LibraryEntry::new(
            Library::Humantime,
            inputs.instant.to_system_time()?,
            |t: &SystemTime| humantime::format_rfc3339_micros(*t).to_string(),
        ),
    )?;

    Ok(())
}

fn jiff_format(ts: &jiff::Timestamp) -> Result<String, jiff::Error> {
    let mut buf = String::with_capacity(32);
    JIFF_PRINTER.print_timestamp(ts, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_jiff_format_shape() {
        let dt = Utc.timestamp_opt(1_719_740_760, 123_456_000).unwrap();
        let ts = dt.to_jiff().unwrap().timestamp();
        let text = jiff_format(&ts).unwrap();
        assert_eq!(text, "2024-06-30T09:46:00.123456Z");
        assert_eq!(text, dt.to_rfc3339_opts(SecondsFormat::Micros, true));
    }

    #[test]
    fn test_whole_second_keeps_six_digits() {
        let dt = Utc.timestamp_opt(1_719_740_760, 0).unwrap();
        let text = jiff_format(&dt.to_jiff().unwrap().timestamp()).unwrap();
        assert_eq!(text.len(), 27);
        let human = humantime::format_rfc3339_micros(dt.to_system_time().unwrap()).to_string();
        assert_eq!(human, text);
    }
}
