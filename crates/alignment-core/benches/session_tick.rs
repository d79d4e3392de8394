//! Benchmarks for the session tick loop.
//!
//! Runs the virtual clock with every ticker registered and a steady stream
//! of player actions feeding the debounce buffer.

use std::hint::black_box;

use alignment_core::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn late_game() -> GameState {
    let mut s = GameState::new();
    s.phase = 5;
    s.resources.paperclips = 1e7;
    s.resources.materials = 1e7;
    s.resources.energy = 1e7;
    s.resources.knowledge = 1e6;
    s.resources.influence = 150.0;
    s.capabilities.intelligence = 5.0;
    s
}

fn bench_idle_minute(c: &mut Criterion) {
    c.bench_function("idle_minute_phase_0", |b| {
        b.iter(|| {
            let mut session = Session::with_rng(EngineConfig::default(), StdRng::seed_from_u64(42));
            session.start();
            session.advance(black_box(60_000));
            black_box(session.revision())
        });
    });
}

fn bench_production_loop(c: &mut Criterion) {
    c.bench_function("produce_every_100ms_for_a_minute", |b| {
        b.iter(|| {
            let mut session = Session::with_rng(EngineConfig::default(), StdRng::seed_from_u64(42));
            session.start();
            for _ in 0..600 {
                let _ = session.perform(Action::ProduceBasic);
                session.advance(100);
            }
            black_box(session.state().total_paperclips)
        });
    });
}

fn bench_cosmic_loop(c: &mut Criterion) {
    c.bench_function("cosmic_probes_and_rolls", |b| {
        b.iter(|| {
            let mut session = Session::with_state(
                EngineConfig::default(),
                StdRng::seed_from_u64(42),
                late_game(),
            );
            session.start();
            let _ = session.launch_probe("basic_replicator");
            for _ in 0..600 {
                let _ = session.perform(Action::ProduceBasic);
                session.advance(100);
            }
            black_box(session.cosmic_panel().total_probes())
        });
    });
}

criterion_group!(
    benches,
    bench_idle_minute,
    bench_production_loop,
    bench_cosmic_loop
);
criterion_main!(benches);
