// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark harness for timing library entries.
//!
//! Runs a warm-up phase, then records one nanosecond sample per invocation.
//! Results of the timed calls are never inspected; the entry passes them
//! through `black_box` itself.

use std::time::Instant;

use datebench_core::{Candidate, HarnessConfig};

/// A benchmark harness for measuring per-call latency.
pub struct BenchmarkHarness {
    /// Number of warmup iterations before measurement
    warmup_iterations: u64,
    /// Number of measurement iterations
    measurement_iterations: u64,
    /// Whether to keep raw sample data
    keep_raw_samples: bool,
}

impl BenchmarkHarness {
    /// Create a new benchmark harness with default settings.
    pub fn new() -> Self {
        Self::from_config(&HarnessConfig::default())
    }

    /// Create a harness from validated configuration.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            warmup_iterations: config.warmup_iterations,
            measurement_iterations: config.measurement_iterations,
            keep_raw_samples: config.keep_raw_samples,
        }
    }

    /// Set the number of warmup iterations.
    pub fn warmup(mut self, iterations: u64) -> Self {
        self.warmup_iterations = iterations;
        self
    }

    /// Set the number of measurement iterations.
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.measurement_iterations = iterations;
        self
    }

    /// Run a benchmark and collect latency samples.
    ///
    /// The closure should perform a single iteration of the operation being measured.
    /// Returns a vector of latency samples in nanoseconds.
    pub fn run<F>(&self, mut operation: F) -> Vec<u64>
    where
        F: FnMut(),
    {
        for _ in 0..self.warmup_iterations {
            operation();
        }

        let mut samples = Vec::with_capacity(self.measurement_iterations as usize);
        for _ in 0..self.measurement_iterations {
            let start = Instant::now();
            operation();
            samples.push(start.elapsed().as_nanos() as u64);
        }

        samples
    }

    /// Time one library entry: one sample per timed unit.
    pub fn time(&self, entry: &dyn Candidate) -> Vec<u64> {
        self.run(|| entry.invoke())
    }

    pub fn measurement_iterations(&self) -> u64 {
        self.measurement_iterations
    }

    /// Check if raw samples should be kept.
    pub fn should_keep_samples(&self) -> bool {
        self.keep_raw_samples
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}
