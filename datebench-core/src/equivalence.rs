// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Cross-library equivalence checks.
//!
//! Every registered library is invoked once on its probe input, the results
//! are projected with the operation's projection, and all projections must be
//! equal. Coarse projections (a single field, a string length) are kept on
//! purpose: libraries legitimately differ in precision and offset rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EquivalenceError;
use crate::observe::ObserveFailure;
use crate::registry::Operation;
use crate::types::{Library, OperationFamily, OperationName, Projected, Projection};

/// Outcome of a passing check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquivalenceReport {
    pub operation: OperationName,
    pub projection: Projection,
    /// The agreed value; `None` when the operation has no entries.
    pub value: Option<Projected>,
    pub values: BTreeMap<Library, Projected>,
}

impl EquivalenceReport {
    /// Number of libraries that took part.
    pub fn library_count(&self) -> usize {
        self.values.len()
    }
}

/// Verify that a set of projected values has exactly one distinct element.
pub fn check_values(
    operation: &OperationName,
    projection: Projection,
    values: BTreeMap<Library, Projected>,
) -> Result<EquivalenceReport, EquivalenceError> {
    let mut distinct: Vec<Projected> = Vec::new();
    for value in values.values() {
        if !distinct.contains(value) {
            distinct.push(*value);
        }
    }

    if distinct.len() > 1 {
        return Err(EquivalenceError::Mismatch {
            operation: operation.clone(),
            projection,
            values,
        });
    }

    Ok(EquivalenceReport {
        operation: operation.clone(),
        projection,
        value: distinct.first().copied(),
        values,
    })
}

/// Invoke every entry of `operation` once and project the results.
pub fn observe_all(
    operation: &Operation,
) -> Result<BTreeMap<Library, Projected>, EquivalenceError> {
    let projection = operation.projection();
    let mut values = BTreeMap::new();

    for entry in operation.entries() {
        let library = entry.library();
        let value = entry
            .observe(projection)
            .map_err(|failure| observe_error(operation, library, failure))?;
        values.insert(library, value);
    }

    Ok(values)
}

/// Observe every batch input of every entry.
///
/// Each batch input must succeed, and libraries must agree input by input,
/// so a timed batch never measures an error path.
pub fn check_batches(operation: &Operation) -> Result<(), EquivalenceError> {
    let projection = operation.projection();
    let mut batches: BTreeMap<Library, Vec<Projected>> = BTreeMap::new();

    for entry in operation.entries() {
        let library = entry.library();
        let values = entry
            .observe_batch(projection)
            .map_err(|failure| observe_error(operation, library, failure))?;
        if !values.is_empty() {
            batches.insert(library, values);
        }
    }

    let len = batches.values().map(Vec::len).max().unwrap_or(0);
    for index in 0..len {
        let values = batches
            .iter()
            .filter_map(|(library, values)| values.get(index).map(|value| (*library, *value)))
            .collect();
        check_values(operation.name(), projection, values)?;
    }

    Ok(())
}

fn observe_error(
    operation: &Operation,
    library: Library,
    failure: ObserveFailure,
) -> EquivalenceError {
    match failure {
        ObserveFailure::Failed(message) => EquivalenceError::Invocation {
            operation: operation.name().clone(),
            library,
            message,
        },
        ObserveFailure::Unsupported { type_name } => EquivalenceError::Unprojectable {
            operation: operation.name().clone(),
            library,
            projection: operation.projection(),
            type_name,
        },
    }
}

/// Runs equivalence checks, retrying clock reads that may straddle a boundary.
#[derive(Debug, Clone)]
pub struct EquivalenceChecker {
    /// Extra attempts allowed for `now` operations after a mismatch.
    clock_retries: u32,
}

impl EquivalenceChecker {
    /// Create a checker with one retry for clock reads.
    pub fn new() -> Self {
        Self { clock_retries: 1 }
    }

    /// Set the number of retries for clock reads.
    pub fn clock_retries(mut self, retries: u32) -> Self {
        self.clock_retries = retries;
        self
    }

    /// Check one operation across all of its registered libraries, on the
    /// probe input and then on every batch input.
    pub fn check(&self, operation: &Operation) -> Result<EquivalenceReport, EquivalenceError> {
        let retries = match operation.family() {
            OperationFamily::Now => self.clock_retries,
            _ => 0,
        };

        let mut attempt = 0;
        loop {
            let values = observe_all(operation)?;
            match check_values(operation.name(), operation.projection(), values) {
                Ok(report) => {
                    if let Err(err) = check_batches(operation) {
                        warn!(error = %err, "Batch inputs failed the equivalence check");
                        return Err(err);
                    }
                    debug!(
                        operation = %report.operation,
                        libraries = report.library_count(),
                        value = ?report.value,
                        "Libraries agree"
                    );
                    return Ok(report);
                }
                Err(err) if attempt < retries => {
                    attempt += 1;
                    warn!(error = %err, attempt, "Clock reads disagree, retrying");
                }
                Err(err) => {
                    warn!(error = %err, "Equivalence check failed");
                    return Err(err);
                }
            }
        }
    }
}

impl Default for EquivalenceChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{nullary, LibraryEntry, OperationRegistry};
    use std::sync::atomic::{AtomicU8, Ordering};
    use std::sync::Arc;

    fn op(name: &str) -> OperationName {
        OperationName::new(name).unwrap()
    }

    fn registry(projection: Projection, family: OperationFamily) -> OperationRegistry {
        let mut registry = OperationRegistry::new();
        registry
            .declare(op("probe"), projection, family, "test operation")
            .unwrap();
        registry
    }

    #[test]
    fn test_single_value_passes() {
        let mut values = BTreeMap::new();
        values.insert(Library::Chrono, Projected::Integer(19));
        values.insert(Library::Time, Projected::Integer(19));

        let report = check_values(&op("probe"), Projection::DayOfMonth, values).unwrap();
        assert_eq!(report.value, Some(Projected::Integer(19)));
        assert_eq!(report.library_count(), 2);
    }

    #[test]
    fn test_mismatch_carries_all_values() {
        let mut values = BTreeMap::new();
        values.insert(Library::Chrono, Projected::Integer(27));
        values.insert(Library::Jiff, Projected::Integer(27));
        values.insert(Library::Humantime, Projected::Integer(32));

        let err = check_values(&op("probe"), Projection::Length, values).unwrap_err();
        match err {
            EquivalenceError::Mismatch { values, .. } => {
                assert_eq!(values.len(), 3);
                assert_eq!(values[&Library::Humantime], Projected::Integer(32));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_and_single_entry_pass() {
        let report = check_values(&op("probe"), Projection::Length, BTreeMap::new()).unwrap();
        assert_eq!(report.value, None);

        let mut registry = registry(Projection::TotalSeconds, OperationFamily::Parse);
        registry
            .register("probe", LibraryEntry::new(Library::Jiff, 1.5f64, |v: &f64| *v))
            .unwrap();
        let report = EquivalenceChecker::new()
            .check(registry.resolve("probe").unwrap())
            .unwrap();
        assert_eq!(report.value, Some(Projected::Seconds(1.5)));
    }

    #[test]
    fn test_invocation_failure_is_reported() {
        let mut registry = registry(Projection::DayOfMonth, OperationFamily::Parse);
        registry
            .register(
                "probe",
                LibraryEntry::new(Library::Jiff, "garbage", |s: &&str| {
                    s.parse::<jiff::Timestamp>()
                }),
            )
            .unwrap();

        let err = EquivalenceChecker::new()
            .check(registry.resolve("probe").unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            EquivalenceError::Invocation {
                library: Library::Jiff,
                ..
            }
        ));
    }

    #[test]
    fn test_unprojectable_is_reported() {
        let mut registry = registry(Projection::DayOfMonth, OperationFamily::Format);
        registry
            .register(
                "probe",
                LibraryEntry::new(Library::Chrono, (), |_: &()| String::from("x")),
            )
            .unwrap();

        let err = EquivalenceChecker::new()
            .check(registry.resolve("probe").unwrap())
            .unwrap_err();
        assert!(matches!(err, EquivalenceError::Unprojectable { .. }));
    }

    #[test]
    fn test_failing_batch_input_is_reported() {
        let mut registry = registry(Projection::DayOfMonth, OperationFamily::Parse);
        registry
            .register(
                "probe",
                LibraryEntry::new(Library::Jiff, "1996-12-20T00:39:57Z", |s: &&str| {
                    s.parse::<jiff::Timestamp>()
                })
                .with_batch(["1996-12-20T00:39:57Z", "not a timestamp"]),
            )
            .unwrap();

        let err = EquivalenceChecker::new()
            .check(registry.resolve("probe").unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            EquivalenceError::Invocation {
                library: Library::Jiff,
                ..
            }
        ));
    }

    #[test]
    fn test_batch_disagreement_is_reported() {
        let mut registry = registry(Projection::DayOfMonth, OperationFamily::Parse);
        registry
            .register(
                "probe",
                LibraryEntry::new(Library::Chrono, 19u8, |d: &u8| *d).with_batch([12u8, 19]),
            )
            .unwrap();
        registry
            .register(
                "probe",
                LibraryEntry::new(Library::Time, 19u8, |d: &u8| *d).with_batch([12u8, 20]),
            )
            .unwrap();

        let operation = registry.resolve("probe").unwrap();
        assert!(matches!(
            check_batches(operation),
            Err(EquivalenceError::Mismatch { .. })
        ));
        assert!(EquivalenceChecker::new().check(operation).is_err());
    }

    #[test]
    fn test_clock_mismatch_is_retried() {
        // First read disagrees, second agrees: simulates an hour rollover.
        let reads = Arc::new(AtomicU8::new(0));
        let counter = Arc::clone(&reads);

        let mut registry = registry(Projection::HourOfDay, OperationFamily::Now);
        registry
            .register("probe", nullary(Library::Chrono, || 10u8))
            .unwrap();
        registry
            .register(
                "probe",
                nullary(Library::Time, move || {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        9u8
                    } else {
                        10u8
                    }
                }),
            )
            .unwrap();

        let report = EquivalenceChecker::new()
            .check(registry.resolve("probe").unwrap())
            .unwrap();
        assert_eq!(report.value, Some(Projected::Integer(10)));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_retry_outside_clock_reads() {
        let mut registry = registry(Projection::DayOfMonth, OperationFamily::Manipulate);
        registry
            .register("probe", nullary(Library::Chrono, || 1u8))
            .unwrap();
        registry
            .register("probe", nullary(Library::Time, || 2u8))
            .unwrap();

        let result = EquivalenceChecker::new()
            .clock_retries(5)
            .check(registry.resolve("probe").unwrap());
        assert!(matches!(result, Err(EquivalenceError::Mismatch { .. })));
    }
}
