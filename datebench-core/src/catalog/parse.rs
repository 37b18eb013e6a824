// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Parsing timestamps, ISO 8601 / RFC 3339 text and durations.

use std::time::{Duration, UNIX_EPOCH};

use jiff::fmt::temporal::{Pieces, PiecesOffset};
use jiff::tz::{Offset, TimeZone};

use crate::error::{DateBenchError, DateBenchResult};
use crate::inputs::SharedInputs;
use crate::registry::{LibraryEntry, OperationRegistry};
use crate::types::{Library, OperationFamily, Projection};

use super::{
    declare, HUMANTIME_DURATION, ISO_8601_DURATION, PARSE_DURATION_FROM_ISO_8601,
    PARSE_UTC_FROM_ISO_8601, PARSE_UTC_FROM_RFC_3339, PARSE_UTC_FROM_TIMESTAMP, RFC_3339_EXAMPLES,
    RFC_3339_PROBE,
};

pub(super) fn define(registry: &mut OperationRegistry, inputs: &SharedInputs) -> DateBenchResult<()> {
    from_timestamp(registry, inputs.unix_time)?;
    from_iso_8601(registry, inputs)?;
    duration_from_iso_8601(registry)?;
    from_rfc_3339(registry)?;
    Ok(())
}

fn from_timestamp(registry: &mut OperationRegistry, unix_time: i64) -> DateBenchResult<()> {
    declare(
        registry,
        PARSE_UTC_FROM_TIMESTAMP,
        Projection::DayOfMonth,
        OperationFamily::Parse,
        "Build a UTC instant from whole UNIX seconds",
    )?;

    registry.register(
        PARSE_UTC_FROM_TIMESTAMP,
        LibraryEntry::new(Library::Chrono, unix_time, |ts: &i64| {
            chrono::DateTime::from_timestamp(*ts, 0)
        }),
    )?;
    registry.register(
        PARSE_UTC_FROM_TIMESTAMP,
        LibraryEntry::new(Library::Time, unix_time, |ts: &i64| {
            time::OffsetDateTime::from_unix_timestamp(*ts)
        }),
    )?;
    registry.register(
        PARSE_UTC_FROM_TIMESTAMP,
        LibraryEntry::new(Library::Jiff, unix_time, |ts: &i64| {
            jiff::Timestamp::from_second(*ts)
        }),
    )?;

    let secs = u64::try_from(unix_time).map_err(|e| DateBenchError::InputConversion {
        library: Library::Std,
        message: e.to_string(),
    })?;
    registry.register(
        PARSE_UTC_FROM_TIMESTAMP,
        LibraryEntry::new(Library::Std, secs, |secs: &u64| {
            UNIX_EPOCH.checked_add(Duration::from_secs(*secs))
        }),
    )?;

    Ok(())
}

fn from_iso_8601(registry: &mut OperationRegistry, inputs: &SharedInputs) -> DateBenchResult<()> {
    declare(
        registry,
        PARSE_UTC_FROM_ISO_8601,
        Projection::DayOfMonth,
        OperationFamily::Parse,
        "Parse ISO 8601 text carrying a UTC offset",
    )?;

    let text = inputs.iso_8601.clone();
    registry.register(
        PARSE_UTC_FROM_ISO_8601,
        LibraryEntry::new(Library::Chrono, text.clone(), |s: &String| {
            chrono::DateTime::parse_from_rfc3339(s)
        }),
    )?;
    registry.register(
        PARSE_UTC_FROM_ISO_8601,
        LibraryEntry::new(Library::Time, text.clone(), |s: &String| {
            time::OffsetDateTime::parse(s, &time::format_description::well_known::Iso8601::DEFAULT)
        }),
    )?;
    registry.register(
        PARSE_UTC_FROM_ISO_8601,
        LibraryEntry::new(Library::Jiff, text, |s: &String| s.parse::<jiff::Timestamp>()),
    )?;
    // humantime only reads the `Z` designator.
    registry.register(
        PARSE_UTC_FROM_ISO_8601,
        LibraryEntry::new(Library::Humantime, inputs.iso_8601_zulu(), |s: &String| {
            humantime::parse_rfc3339(s)
        }),
    )?;

    Ok(())
}

fn duration_from_iso_8601(registry: &mut OperationRegistry) -> DateBenchResult<()> {
    declare(
        registry,
        PARSE_DURATION_FROM_ISO_8601,
        Projection::TotalSeconds,
        OperationFamily::Parse,
        "Parse a 36 hour duration: ISO 8601 P1DT12H, humantime in its own 1day 12h syntax",
    )?;

    registry.register(
        PARSE_DURATION_FROM_ISO_8601,
        LibraryEntry::new(Library::Jiff, ISO_8601_DURATION, |s: &&str| {
            jiff_parse_duration(s)
        }),
    )?;
    registry.register(
        PARSE_DURATION_FROM_ISO_8601,
        LibraryEntry::new(Library::Humantime, HUMANTIME_DURATION, |s: &&str| {
            humantime::parse_duration(s)
        }),
    )?;

    Ok(())
}

fn from_rfc_3339(registry: &mut OperationRegistry) -> DateBenchResult<()> {
    declare(
        registry,
        PARSE_UTC_FROM_RFC_3339,
        Projection::DayOfMonth,
        OperationFamily::Parse,
        "Parse RFC 3339 text, keeping the literal's own offset",
    )?;

    registry.register(
        PARSE_UTC_FROM_RFC_3339,
        LibraryEntry::new(Library::Chrono, RFC_3339_PROBE, |s: &&str| {
            chrono::DateTime::parse_from_rfc3339(s)
        })
        .with_batch(RFC_3339_EXAMPLES),
    )?;
    registry.register(
        PARSE_UTC_FROM_RFC_3339,
        LibraryEntry::new(Library::Time, RFC_3339_PROBE, |s: &&str| {
            time::OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)
        })
        .with_batch(RFC_3339_EXAMPLES),
    )?;
    registry.register(
        PARSE_UTC_FROM_RFC_3339,
        LibraryEntry::new(Library::Jiff, RFC_3339_PROBE, |s: &&str| jiff_parse_rfc3339(s))
            .with_batch(RFC_3339_EXAMPLES),
    )?;
    // humantime is left out: it normalizes to UTC and rejects numeric offsets.

    Ok(())
}

/// ISO 8601 duration into an exact duration, treating days as 24 hours.
fn jiff_parse_duration(text: &str) -> Result<jiff::SignedDuration, jiff::Error> {
    let span: jiff::Span = text.parse()?;
    span.to_duration(jiff::SpanRelativeTo::days_are_24_hours())
}

/// RFC 3339 text into a zoned datetime at the literal's fixed offset.
///
/// Parsing straight into `Zoned` wants a bracketed time zone annotation, so
/// the pieces are assembled by hand.
fn jiff_parse_rfc3339(text: &str) -> Result<jiff::Zoned, jiff::Error> {
    let pieces = Pieces::parse(text)?;
    let offset = match pieces.offset() {
        Some(PiecesOffset::Numeric(numeric)) => numeric.offset(),
        _ => Offset::UTC,
    };
    let time = pieces.time().unwrap_or(jiff::civil::Time::midnight());
    pieces
        .date()
        .to_datetime(time)
        .to_zoned(TimeZone::fixed(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::Observe;
    use crate::types::Projected;

    #[test]
    fn test_jiff_rfc3339_keeps_offset() {
        let zdt = jiff_parse_rfc3339(RFC_3339_PROBE).unwrap();
        assert_eq!(zdt.day(), 19);
        assert_eq!(zdt.hour(), 16);
        assert_eq!(zdt.offset().seconds(), -8 * 3600);
    }

    #[test]
    fn test_jiff_rfc3339_batch() {
        for text in RFC_3339_EXAMPLES {
            assert!(jiff_parse_rfc3339(text).is_ok(), "failed to parse {text}");
        }
        let zulu = jiff_parse_rfc3339("1985-04-12T23:20:50.52Z").unwrap();
        assert_eq!(zulu.offset(), Offset::UTC);
        assert_eq!(zulu.day(), 12);
    }

    #[test]
    fn test_duration_spellings_agree() {
        let jiff = jiff_parse_duration(ISO_8601_DURATION).unwrap();
        let human = humantime::parse_duration(HUMANTIME_DURATION).unwrap();
        assert_eq!(jiff.as_secs(), 129_600);
        assert_eq!(
            jiff.observe(Projection::TotalSeconds).unwrap(),
            human.observe(Projection::TotalSeconds).unwrap()
        );
        assert_eq!(
            human.observe(Projection::TotalSeconds).unwrap(),
            Projected::Seconds(129_600.0)
        );
    }
}
