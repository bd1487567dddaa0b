//! # Quantum-Chain Subsystem Benchmarks
//!
//! | Subsystem | Claim | Measured |
//! |-----------|-------|----------|
//! | qc-18 System Contracts | One batched invocation is cheaper than N separate ones | `multicall` vs N x `call` |
//! | qc-18 System Contracts | Rolling back a failed batch costs no more than running it | failing `multicall` |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_18_system_contracts::prelude::*;
use qc_tests::fixtures::{self, ChainConfigContract};
use std::time::Duration;

fn producer() -> Address {
    Address::new([0xCB; 20])
}

fn context(height: u64) -> ExecutionContext {
    ExecutionContext::new(
        producer(),
        PeerKind::ChainConfig.well_known_address(),
        BlockContext::new(height, producer()),
    )
}

fn validators(count: usize) -> Vec<Address> {
    (0..count as u64).map(|i| Address::from_low_u64(0x10_000 + i)).collect()
}

// ============================================================================
// QC-18: Batched vs Single Invocation
// ============================================================================

fn bench_batch_vs_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-system-contracts");
    group.measurement_time(Duration::from_secs(5));

    for size in [1usize, 10, 50, 200] {
        let items: Vec<Bytes> = validators(size).into_iter().map(fixtures::reward).collect();
        let batch = fixtures::multicall(items.clone());
        let ctx = context(5);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("single_calls", size), &items, |b, items| {
            b.iter(|| {
                let mut contract = ChainConfigContract::new(InMemoryStorage::new());
                for item in items {
                    black_box(contract.call(&ctx, item.as_slice()).is_ok());
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("multicall", size), &batch, |b, batch| {
            b.iter(|| {
                let mut contract = ChainConfigContract::new(InMemoryStorage::new());
                black_box(contract.call(&ctx, batch.as_slice()).is_ok())
            })
        });
    }

    group.finish();
}

fn bench_batch_rollback(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18-system-contracts-rollback");

    for size in [10usize, 100] {
        let mut items: Vec<Bytes> = validators(size).into_iter().map(fixtures::reward).collect();
        // Last item fails: producer is not governance
        items.push(fixtures::set_epoch_length(1));
        let batch = fixtures::multicall(items);
        let ctx = context(5);

        group.bench_with_input(BenchmarkId::new("failing_multicall", size), &batch, |b, batch| {
            b.iter(|| {
                let mut contract = ChainConfigContract::new(InMemoryStorage::new());
                black_box(contract.call(&ctx, batch.as_slice()).is_err())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_batch_vs_single, bench_batch_rollback);
criterion_main!(benches);
