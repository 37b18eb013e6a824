// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Clock reads.

use std::time::SystemTime;

use crate::error::DateBenchResult;
use crate::registry::{nullary, OperationRegistry};
use crate::types::{Library, OperationFamily, Projection};

use super::{declare, NOW_LOCAL, NOW_UTC};

pub(super) fn define(registry: &mut OperationRegistry) -> DateBenchResult<()> {
    declare(
        registry,
        NOW_UTC,
        Projection::HourOfDay,
        OperationFamily::Now,
        "Read the current instant in UTC",
    )?;
    registry.register(NOW_UTC, nullary(Library::Chrono, chrono::Utc::now))?;
    registry.register(NOW_UTC, nullary(Library::Time, time::OffsetDateTime::now_utc))?;
    registry.register(NOW_UTC, nullary(Library::Jiff, jiff::Timestamp::now))?;
    registry.register(NOW_UTC, nullary(Library::Std, SystemTime::now))?;

    declare(
        registry,
        NOW_LOCAL,
        Projection::HourOfDay,
        OperationFamily::Now,
        "Read the current instant in the system time zone",
    )?;
    registry.register(NOW_LOCAL, nullary(Library::Chrono, chrono::Local::now))?;
    // time: `OffsetDateTime::now_local` refuses to read the local offset once
    // the process has more than one thread, so it cannot run under a harness.
    registry.register(NOW_LOCAL, nullary(Library::Jiff, jiff::Zoned::now))?;

    Ok(())
}
