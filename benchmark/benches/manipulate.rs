// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shifts, duration conversion and weekday queries.

mod common;

use criterion::{criterion_group, criterion_main, Criterion};
use datebench_core::OperationFamily;

fn bench_manipulate(c: &mut Criterion) {
    common::bench_family(c, OperationFamily::Manipulate);
}

criterion_group!(benches, bench_manipulate);
criterion_main!(benches);
