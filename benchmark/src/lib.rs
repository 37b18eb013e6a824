// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Datebench Benchmarking Framework
//!
//! Times every (operation, library) case of the datebench catalog, after
//! checking that all libraries agree on the operation's result.
//!
//! # Benchmark Categories
//!
//! - **Now**: clock reads in UTC and in the local time zone
//! - **Parse**: timestamps, ISO 8601 / RFC 3339 text, durations
//! - **Manipulate**: shifts, duration conversion, weekday queries
//! - **Format**: ISO 8601 rendering
//!
//! # Data Output
//!
//! Runs are saved as JSON reports carrying the seed needed to reproduce them.

pub mod harness;
pub mod metrics;
pub mod reporter;
pub mod runner;

pub use harness::BenchmarkHarness;
pub use metrics::{BenchmarkCategory, BenchmarkReport, BenchmarkResult, LatencyMetrics, SystemInfo};
pub use reporter::{JsonReporter, ReporterError};
pub use runner::{CaseRunner, RunOutcome, RunnerError};
