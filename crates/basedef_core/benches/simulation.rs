//! Simulation benchmarks for basedef_core.
//!
//! Run with: `cargo bench -p basedef_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use basedef_core::prelude::*;

/// A built-out session: base, transporter spine, and a band of producers.
fn populated_session() -> GameSession {
    let config = GenerationConfig::startup().with_seed(1909);
    let mut session = GameSession::new(&config);

    session.try_place(BuildingKind::Base, TilePos::new(20, 20));
    for i in 1..=5 {
        session.try_place(BuildingKind::Transporter, TilePos::new(20 + i * 4, 20));
        session.try_place(BuildingKind::Transporter, TilePos::new(20 - i * 4, 20));
        session.try_place(BuildingKind::Transporter, TilePos::new(20, 20 + i * 4));
    }
    for i in 0..10 {
        session.try_place(BuildingKind::Factory, TilePos::new(10 + i * 2, 22));
        session.try_place(BuildingKind::Cannon, TilePos::new(10 + i * 2, 24));
    }
    session
}

pub fn simulation_benchmark(c: &mut Criterion) {
    let session = populated_session();

    c.bench_function("connectivity_recompute", |b| {
        b.iter(|| recompute(black_box(session.registry())))
    });

    c.bench_function("production_tick", |b| {
        let connected = recompute(session.registry());
        let registry = session.registry().clone();
        let grid = session.grid().clone();
        b.iter(|| {
            let mut economy = EconomyState::new();
            economy.iron = 100;
            economy.ammo_cores = 100;
            production_tick(
                black_box(&mut economy),
                black_box(&registry),
                black_box(&grid),
                black_box(&connected),
            )
        })
    });

    c.bench_function("map_generation", |b| {
        b.iter(|| generate_deposits(black_box(&GenerationConfig::startup().with_seed(42))))
    });
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
