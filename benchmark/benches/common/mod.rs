// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shared setup for the criterion benches.
//!
//! Each bench target builds the full registry, checks equivalence for its
//! operation family and then benchmarks every library of every operation in
//! its own criterion group.

use criterion::{BenchmarkId, Criterion};
use datebench_core::{
    build_registry, Config, EquivalenceChecker, InputGenerator, OperationFamily,
    OperationRegistry,
};

/// Environment variable that pins the input seed.
pub const SEED_VAR: &str = "DATEBENCH_SEED";

/// Build the registry, seeded from `DATEBENCH_SEED` when set.
pub fn registry() -> OperationRegistry {
    let seed = std::env::var(SEED_VAR).ok().and_then(|s| s.parse().ok());
    let mut generator = InputGenerator::from_optional_seed(seed);
    eprintln!("datebench seed: {}", generator.seed());
    build_registry(&mut generator, &Config::default()).expect("Failed to build registry")
}

/// Benchmark every operation of `family`, one group per operation.
///
/// Panics if the libraries of an operation disagree: timing them would be
/// meaningless.
pub fn bench_family(c: &mut Criterion, family: OperationFamily) {
    let registry = registry();
    let checker = EquivalenceChecker::new();

    for op in registry.operations().filter(|op| op.family() == family) {
        if let Err(e) = checker.check(op) {
            panic!("{e}");
        }

        let mut group = c.benchmark_group(op.name().as_str());
        for entry in op.entries() {
            group.bench_with_input(
                BenchmarkId::from_parameter(entry.library()),
                &entry,
                |b, entry| b.iter(|| entry.invoke()),
            );
        }
        group.finish();
    }
}
