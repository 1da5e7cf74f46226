//! Integration test: stimulus ordering through the driving loop.

use taukin_engine::{SimConfig, Simulation, Stimulus, StimulusQueue};
use taukin_test_utils::stimulus_target;

#[test]
fn stimulus_window_shows_in_recorded_trace() {
    let mut sim = Simulation::new(stimulus_target(), SimConfig::default()).unwrap();
    let stim = sim.model().mol_id("stim").unwrap();
    let mut q = StimulusQueue::new();
    q.push(&sim, &Stimulus::new("stim", 5.0, 20.0, 60.0)).unwrap();

    let summary = q.run(&mut sim, 100.0);
    assert_eq!(summary.runtime, 100.0);

    let trace = sim.history().series(stim);
    assert_eq!(trace.len(), 100);
    for (k, &v) in trace.iter().enumerate() {
        let expected = if (20..60).contains(&k) { 5.0 } else { 0.0 };
        assert_eq!(v, expected, "t = {k}");
    }
}

#[test]
fn response_follows_stimulus() {
    let mut sim = Simulation::new(stimulus_target(), SimConfig::default()).unwrap();
    let resp = sim.model().mol_id("resp").unwrap();
    let mut q = StimulusQueue::new();
    q.push(&sim, &Stimulus::new("stim", 2.0, 10.0, 30.0)).unwrap();
    q.run(&mut sim, 50.0);

    let trace = sim.history().series(resp);
    assert_eq!(trace[10], 0.0);
    assert!((trace[29] - 2.0).abs() < 1e-6);
    assert!(trace[49] < 1e-6);
}

#[test]
fn malformed_stimuli_are_skipped_and_run_proceeds() {
    let mut sim = Simulation::new(stimulus_target(), SimConfig::default()).unwrap();
    let fields: Vec<Vec<&str>> = vec![
        vec!["stim"],
        vec!["nobody", "1"],
        vec!["stim", "1", "5", "15"],
    ];
    let mut q = StimulusQueue::new();
    let skipped = q.extend_lossy(
        &sim,
        fields.iter().map(|f| Stimulus::parse(f.as_slice(), 20.0, 1.0)),
    );
    assert_eq!(skipped, 2);
    let summary = q.run(&mut sim, 20.0);
    assert_eq!(summary.events_applied, 2);
    assert_eq!(sim.history().len(), 20);
}

#[test]
fn stop_beyond_runtime_extends_run() {
    let mut sim = Simulation::new(stimulus_target(), SimConfig::default()).unwrap();
    let mut q = StimulusQueue::new();
    q.push(&sim, &Stimulus::new("stim", 1.0, 0.0, 150.0)).unwrap();
    let summary = q.run(&mut sim, 100.0);
    assert_eq!(summary.runtime, 150.0);
    assert_eq!(sim.history().len(), 150);
}

#[test]
fn off_grid_event_times_do_not_drift_the_clock() {
    let mut sim = Simulation::new(stimulus_target(), SimConfig::default()).unwrap();
    let mut q = StimulusQueue::new();
    for k in 0..5 {
        let start = 1.2 * k as f64;
        q.push(&sim, &Stimulus::new("stim", 1.0, start, start + 0.6))
            .unwrap();
    }
    let summary = q.run(&mut sim, 6.0);
    assert_eq!(summary.runtime, 6.0);
    assert_eq!(summary.events_applied, 10);
    assert_eq!(sim.time(), 6.0);
    assert_eq!(sim.history().len(), 6);
}
