//! Criterion benchmarks for scheduling and stepping.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use taukin_bench::{layered_network, NetworkShape};
use taukin_engine::{SimConfig, Simulation, Stimulus, StimulusQueue};
use taukin_test_utils::chain;

/// Benchmark: build and schedule the reference network (1100 reactions).
fn bench_schedule_reference(c: &mut Criterion) {
    c.bench_function("schedule_reference", |b| {
        b.iter(|| {
            let model = layered_network(NetworkShape::REFERENCE, 42).unwrap();
            black_box(model.sequence_depth());
        });
    });
}

/// Benchmark: schedule a 200-link chain declared in reverse order.
fn bench_schedule_deep_chain(c: &mut Criterion) {
    c.bench_function("schedule_chain_200", |b| {
        b.iter(|| black_box(chain(200).sequence_depth()));
    });
}

/// Benchmark: 100 recorded steps of the reference network.
fn bench_advance_reference(c: &mut Criterion) {
    let model = layered_network(NetworkShape::REFERENCE, 42).unwrap();
    let mut sim = Simulation::new(model, SimConfig::default()).unwrap();

    c.bench_function("advance_100_reference", |b| {
        b.iter(|| {
            sim.reinit();
            black_box(sim.advance(100.0, false));
        });
    });
}

/// Benchmark: settle the reference network.
fn bench_settle_reference(c: &mut Criterion) {
    let model = layered_network(NetworkShape::REFERENCE, 42).unwrap();
    let mut sim = Simulation::new(model, SimConfig::default()).unwrap();

    c.bench_function("settle_reference", |b| {
        b.iter(|| {
            sim.reinit();
            black_box(sim.advance(1000.0, true));
        });
    });
}

/// Benchmark: a stimulus-driven run with fine internal steps.
fn bench_stimulus_run_small(c: &mut Criterion) {
    let model = layered_network(NetworkShape::SMALL, 7).unwrap();
    let config = SimConfig::default().with_internal_dt(0.1);
    let mut sim = Simulation::new(model, config).unwrap();
    let mut queue = StimulusQueue::new();
    for k in 0..5 {
        let start = 10.0 * k as f64;
        queue
            .push(
                &sim,
                &Stimulus::new(taukin_bench::node_name(0, k), 5.0, start, start + 5.0),
            )
            .unwrap();
    }

    c.bench_function("stimulus_run_small", |b| {
        b.iter(|| {
            sim.reinit();
            black_box(queue.run(&mut sim, 100.0));
        });
    });
}

criterion_group!(
    benches,
    bench_schedule_reference,
    bench_schedule_deep_chain,
    bench_advance_reference,
    bench_settle_reference,
    bench_stimulus_run_small,
);
criterion_main!(benches);
