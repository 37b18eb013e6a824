// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Case runner: check equivalence per operation, then time every library.
//!
//! An operation whose libraries disagree is marked failed and none of its
//! cases are timed. The run carries on with the remaining operations.

use datebench_core::{
    Config, DateBenchError, EquivalenceChecker, EquivalenceError, Operation, OperationRegistry,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::harness::BenchmarkHarness;
use crate::metrics::{BenchmarkReport, BenchmarkResult};

/// Errors that stop a run before any case executes.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Core(#[from] DateBenchError),

    #[error("No cases selected: every selected operation has no registered library")]
    NoCases,
}

/// Result of a complete run.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: BenchmarkReport,
    /// Operations whose libraries disagreed or failed
    pub failures: Vec<EquivalenceError>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives every selected case of a registry.
pub struct CaseRunner<'a> {
    config: &'a Config,
    harness: BenchmarkHarness,
    checker: EquivalenceChecker,
    check_only: bool,
}

impl<'a> CaseRunner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            harness: BenchmarkHarness::from_config(&config.harness),
            checker: EquivalenceChecker::new(),
            check_only: false,
        }
    }

    /// Override the harness built from the config.
    pub fn harness(mut self, harness: BenchmarkHarness) -> Self {
        self.harness = harness;
        self
    }

    /// Run equivalence checks only, skipping timing.
    pub fn check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    /// Operations selected by the config that have at least one entry.
    pub fn selected<'r>(
        &self,
        registry: &'r OperationRegistry,
    ) -> impl Iterator<Item = &'r Operation> + 'r {
        let config = self.config.clone();
        registry
            .operations()
            .filter(move |op| config.selects_operation(op.name()) && !op.is_empty())
    }

    pub fn run(&self, registry: &OperationRegistry, seed: u64) -> Result<RunOutcome, RunnerError> {
        let operations: Vec<&Operation> = self.selected(registry).collect();
        if operations.is_empty() {
            return Err(RunnerError::NoCases);
        }

        let mut report = BenchmarkReport::new(seed);
        let mut failures = Vec::new();

        for op in operations {
            match self.checker.check(op) {
                Ok(equivalence) => {
                    info!(
                        operation = %op.name(),
                        libraries = equivalence.library_count(),
                        "Equivalence check passed"
                    );
                    report.add_equivalence(equivalence);
                }
                Err(e) => {
                    warn!(operation = %op.name(), error = %e, "Skipping timing");
                    failures.push(e);
                    continue;
                }
            }

            if self.check_only {
                continue;
            }

            for entry in op.entries() {
                let samples = self.harness.time(entry);
                let result = BenchmarkResult::latency(
                    op.name(),
                    entry.library(),
                    op.family(),
                    op.projection(),
                    samples,
                    self.harness.should_keep_samples(),
                )
                .with_metadata("seed", seed)
                .with_metadata("input", entry.describe_input());

                debug!(
                    case = %result.name,
                    median_ns = result.latency.median_ns,
                    "Timed case"
                );
                report.add_result(result);
            }
        }

        Ok(RunOutcome { report, failures })
    }
}
