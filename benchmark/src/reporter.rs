// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON report files.
//!
//! Reports are written as pretty JSON named after the category, the run
//! timestamp and the first block of the run id.

use crate::metrics::{BenchmarkCategory, BenchmarkReport, BenchmarkResult};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Report file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON reporter for benchmark results.
pub struct JsonReporter {
    /// Output directory for benchmark data
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a new JSON reporter, creating the output directory if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save a whole report to one JSON file.
    ///
    /// Returns the path to the created file.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let mut categories = report.results.iter().map(|r| r.category);
        let label = match categories.next() {
            Some(first) if categories.all(|c| c == first) => first.to_string(),
            _ => "mixed".to_string(),
        };
        self.write(&label, report)
    }

    /// Save one report per operation family.
    pub fn save_by_category(
        &self,
        report: &BenchmarkReport,
    ) -> Result<Vec<PathBuf>, ReporterError> {
        let mut by_category: BTreeMap<BenchmarkCategory, Vec<BenchmarkResult>> = BTreeMap::new();
        for result in &report.results {
            by_category
                .entry(result.category)
                .or_default()
                .push(result.clone());
        }

        let mut paths = Vec::new();
        for (category, results) in by_category {
            let category_report = report.with_results(results);
            paths.push(self.write(&category.to_string(), &category_report)?);
        }

        Ok(paths)
    }

    /// List all existing report files in the output directory.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>, ReporterError> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }

    /// Load an existing report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }

    fn write(&self, label: &str, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%SZ");
        let run = report.run_id.simple().to_string();
        let filename = format!("{}_{}_{}.json", label, timestamp, &run[..8]);
        let filepath = self.output_dir.join(filename);

        let file = File::create(&filepath)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        Ok(filepath)
    }
}
