// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! ISO 8601 rendering.

mod common;

use criterion::{criterion_group, criterion_main, Criterion};
use datebench_core::OperationFamily;

fn bench_format(c: &mut Criterion) {
    common::bench_family(c, OperationFamily::Format);
}

criterion_group!(benches, bench_format);
criterion_main!(benches);
