//! # Quad Ledger Benchmarks
//!
//! Cost of the split/merge paths of the ownership store:
//!
//! | Case | Path |
//! |------|------|
//! | mint 24x24 | single record insert |
//! | transfer one cell out of a 24x24 | full split down to the cell |
//! | transfer it back | merge all the way up |
//! | random cell churn | mixed split/merge under many owners |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qb_01_quad_ledger::{QuadLedger, Region};
use rand::Rng;
use shared_types::{Account, Administrator};
use std::time::Duration;

fn admin() -> Account {
    Account::from_low_u64(0xAD)
}

fn ledger() -> QuadLedger {
    let mut ledger = QuadLedger::new(Administrator::new(admin()).unwrap());
    ledger.set_minter(admin(), admin(), true).unwrap();
    ledger
}

fn bench_mint(c: &mut Criterion) {
    let mut group = c.benchmark_group("qb-01-mint");
    for side in [1u32, 6, 24] {
        group.bench_with_input(BenchmarkId::new("mint", side), &side, |b, &side| {
            b.iter(|| {
                let mut ledger = ledger();
                let region = Region::new(side, 0, 0).unwrap();
                black_box(ledger.mint(admin(), Account::from_low_u64(1), region, &[]))
            })
        });
    }
    group.finish();
}

fn bench_split_and_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("qb-01-split-merge");
    let alice = Account::from_low_u64(1);
    let bob = Account::from_low_u64(2);
    let quad = Region::new(24, 0, 0).unwrap();
    let cell = Region::new(1, 13, 17).unwrap();

    group.bench_function("split_then_merge", |b| {
        let mut ledger = ledger();
        ledger.mint(admin(), alice, quad, &[]).unwrap();
        b.iter(|| {
            ledger.transfer(alice, alice, bob, cell, &[]).unwrap();
            ledger.transfer(bob, bob, alice, cell, &[]).unwrap();
            ledger.take_events();
            black_box(ledger.record_count())
        })
    });
    group.finish();
}

fn bench_cell_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("qb-01-churn");
    group.measurement_time(Duration::from_secs(5));
    let owners: Vec<Account> = (1..=8).map(Account::from_low_u64).collect();

    for ops in [100usize, 1_000] {
        group.throughput(Throughput::Elements(ops as u64));
        group.bench_with_input(BenchmarkId::new("random_cells", ops), &ops, |b, &ops| {
            let mut rng = rand::thread_rng();
            b.iter(|| {
                let mut ledger = ledger();
                ledger
                    .mint(admin(), owners[0], Region::new(24, 0, 0).unwrap(), &[])
                    .unwrap();
                for _ in 0..ops {
                    let cell = Region::new(1, rng.gen_range(0..24), rng.gen_range(0..24)).unwrap();
                    let from = ledger.owner_of(cell.id()).unwrap();
                    let to = owners[rng.gen_range(0..owners.len())];
                    ledger.transfer(from, from, to, cell, &[]).unwrap();
                }
                black_box(ledger.record_count())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mint, bench_split_and_merge, bench_cell_churn);
criterion_main!(benches);
