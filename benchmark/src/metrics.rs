// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Metrics types for benchmark results.
//!
//! One result per (operation, library) case, collected into a report that
//! also records the run id, the input seed and the machine it ran on.

use chrono::{DateTime, Utc};
use datebench_core::{EquivalenceReport, Library, OperationName, Projection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use sysinfo::System;
use uuid::Uuid;

/// Reports are grouped by operation family.
pub use datebench_core::OperationFamily as BenchmarkCategory;

/// Latency metrics with statistical analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// Minimum observed latency in nanoseconds
    pub min_ns: u64,
    /// Maximum observed latency in nanoseconds
    pub max_ns: u64,
    /// Arithmetic mean latency in nanoseconds
    pub mean_ns: f64,
    /// Median (p50) latency in nanoseconds
    pub median_ns: u64,
    /// 95th percentile latency in nanoseconds
    pub p95_ns: u64,
    /// 99th percentile latency in nanoseconds
    pub p99_ns: u64,
    /// Standard deviation in nanoseconds
    pub std_dev_ns: f64,
    /// Raw sample data (optional, downsampled past 10k samples)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<u64>>,
}

impl LatencyMetrics {
    /// Calculate metrics from a vector of latency samples (in nanoseconds).
    pub fn from_samples(mut samples: Vec<u64>, keep_raw: bool) -> Self {
        if samples.is_empty() {
            return Self {
                min_ns: 0,
                max_ns: 0,
                mean_ns: 0.0,
                median_ns: 0,
                p95_ns: 0,
                p99_ns: 0,
                std_dev_ns: 0.0,
                samples: None,
            };
        }

        samples.sort_unstable();
        let len = samples.len();

        let min_ns = samples[0];
        let max_ns = samples[len - 1];
        let sum: u64 = samples.iter().sum();
        let mean_ns = sum as f64 / len as f64;
        let median_ns = samples[len / 2];
        let p95_ns = samples[percentile_index(len, 0.95)];
        let p99_ns = samples[percentile_index(len, 0.99)];

        let variance: f64 = samples
            .iter()
            .map(|&x| {
                let diff = x as f64 - mean_ns;
                diff * diff
            })
            .sum::<f64>()
            / len as f64;
        let std_dev_ns = variance.sqrt();

        let raw_samples = if keep_raw {
            if len > 10_000 {
                Some(samples.iter().step_by(len / 1000).copied().collect())
            } else {
                Some(samples)
            }
        } else {
            None
        };

        Self {
            min_ns,
            max_ns,
            mean_ns,
            median_ns,
            p95_ns,
            p99_ns,
            std_dev_ns,
            samples: raw_samples,
        }
    }

    /// Format latency in human-readable form (auto-selects ns/μs/ms).
    pub fn format_latency(ns: u64) -> String {
        if ns < 1_000 {
            format!("{}ns", ns)
        } else if ns < 1_000_000 {
            format!("{:.2}μs", ns as f64 / 1_000.0)
        } else if ns < 1_000_000_000 {
            format!("{:.2}ms", ns as f64 / 1_000_000.0)
        } else {
            format!("{:.2}s", ns as f64 / 1_000_000_000.0)
        }
    }
}

fn percentile_index(len: usize, quantile: f64) -> usize {
    ((len as f64 * quantile) as usize).min(len - 1)
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Timing of one (operation, library) case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// `<operation>/<library>`
    pub name: String,
    pub category: BenchmarkCategory,
    pub operation: OperationName,
    pub library: Library,
    pub projection: Projection,
    pub latency: LatencyMetrics,
    /// Number of measured samples
    pub iterations: u64,
    /// Additional metadata specific to this case
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl BenchmarkResult {
    /// Create a latency result for one case.
    pub fn latency(
        operation: &OperationName,
        library: Library,
        category: BenchmarkCategory,
        projection: Projection,
        samples: Vec<u64>,
        keep_raw_samples: bool,
    ) -> Self {
        let iterations = samples.len() as u64;
        Self {
            name: format!("{}/{}", operation, library),
            category,
            operation: operation.clone(),
            library,
            projection,
            latency: LatencyMetrics::from_samples(samples, keep_raw_samples),
            iterations,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata to the result. Values that fail to serialize are stored as null.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Complete report of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Framework version
    pub version: String,
    /// Unique id of this run
    pub run_id: Uuid,
    /// Seed the shared inputs were drawn from; rerun with it to reproduce
    pub seed: u64,
    /// Timestamp when benchmarks were run
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    /// Passing equivalence checks, one per operation
    #[serde(default)]
    pub equivalence: Vec<EquivalenceReport>,
    /// Individual case results
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// Create a new, empty report for a run with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            benchmark_suite: "datebench".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: Uuid::new_v4(),
            seed,
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            equivalence: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Add a result to the report.
    pub fn add_result(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    /// Record a passing equivalence check.
    pub fn add_equivalence(&mut self, report: EquivalenceReport) {
        self.equivalence.push(report);
    }

    /// Copy of this report's header with only the given results.
    pub fn with_results(&self, results: Vec<BenchmarkResult>) -> Self {
        Self {
            benchmark_suite: self.benchmark_suite.clone(),
            version: self.version.clone(),
            run_id: self.run_id,
            seed: self.seed,
            timestamp: self.timestamp,
            system_info: self.system_info.clone(),
            equivalence: Vec::new(),
            results,
        }
    }
}
