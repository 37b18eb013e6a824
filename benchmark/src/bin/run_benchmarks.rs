// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI tool to run the cross-validated benchmarks and generate reports.

use clap::Parser;
use datebench_benchmark::{BenchmarkReport, CaseRunner, JsonReporter, LatencyMetrics};
use datebench_core::{build_registry, Config, ConfigLoader, InputGenerator, OperationRegistry};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Cross-validate date/time libraries and time every case")]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for benchmark data
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Number of measured iterations per case (overrides the config)
    #[arg(short, long)]
    iterations: Option<u64>,

    /// Run in quick mode (1 warm-up, 10 measured iterations)
    #[arg(long, conflicts_with = "iterations")]
    quick: bool,

    /// Seed for the shared inputs (overrides the config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Operations to run (all if not specified)
    #[arg(long = "operation")]
    operations: Vec<String>,

    /// Libraries to run (all if not specified)
    #[arg(short, long = "library")]
    libraries: Vec<String>,

    /// Only run the equivalence checks, no timing
    #[arg(long)]
    check_only: bool,

    /// Print the case table and exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&args)?;
    let mut generator = InputGenerator::from_optional_seed(config.seed);
    let seed = generator.seed();
    let registry = build_registry(&mut generator, &config)?;

    if args.list {
        print_cases(&registry, &config);
        return Ok(());
    }

    println!("Datebench Suite");
    println!("===============");
    println!("Seed: {}", seed);
    if !args.check_only {
        println!("Output directory: {:?}", args.output);
        println!("Iterations: {}", config.harness.measurement_iterations);
    }
    println!();

    let outcome = CaseRunner::new(&config)
        .check_only(args.check_only)
        .run(&registry, seed)?;

    for equivalence in &outcome.report.equivalence {
        let value = equivalence
            .value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  ✓ {} ({} = {}, {} libraries)",
            equivalence.operation,
            equivalence.projection,
            value,
            equivalence.library_count()
        );
    }
    for failure in &outcome.failures {
        println!("  ✗ {}", failure);
    }

    if !args.check_only && !outcome.report.results.is_empty() {
        let reporter = JsonReporter::new(&args.output)?;
        let path = reporter.save(&outcome.report)?;
        info!(path = %path.display(), "Saved report");
        println!();
        println!("Benchmark report saved to: {:?}", path);
        println!();
        print_summary(&outcome.report);
    }

    if !outcome.is_success() {
        anyhow::bail!(
            "{} operation(s) failed the equivalence check; rerun with --seed {} to reproduce",
            outcome.failures.len(),
            seed
        );
    }

    Ok(())
}

/// Config file (or defaults), then command-line overrides.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_file(path)?,
        None => Config::default(),
    };

    if !args.libraries.is_empty() {
        config.restrict_libraries(args.libraries.as_slice())?;
    }
    if !args.operations.is_empty() {
        config.restrict_operations(args.operations.as_slice())?;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.quick {
        config.override_iterations(Some(1), Some(10))?;
    } else if args.iterations.is_some() {
        config.override_iterations(None, args.iterations)?;
    }

    Ok(config)
}

fn print_cases(registry: &OperationRegistry, config: &Config) {
    println!("{:<30} {:<12} {:<14} libraries", "operation", "family", "projection");
    for op in registry.operations() {
        if !config.selects_operation(op.name()) {
            continue;
        }
        let libraries: Vec<String> = op.libraries().map(|l| l.to_string()).collect();
        println!(
            "{:<30} {:<12} {:<14} {}",
            op.name().as_str(),
            op.family().name(),
            op.projection().name(),
            libraries.join(", ")
        );
    }
}

fn print_summary(report: &BenchmarkReport) {
    println!("Summary");
    println!("-------");
    println!();

    for result in &report.results {
        println!(
            "{}: median={}, p99={}",
            result.name,
            LatencyMetrics::format_latency(result.latency.median_ns),
            LatencyMetrics::format_latency(result.latency.p99_ns)
        );
    }
}
