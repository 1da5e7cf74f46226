//! Integration test: description → model → simulation.

use std::fs;

use taukin_engine::{SimConfig, Simulation, Stimulus, StimulusQueue};
use taukin_model::{load_from_path, load_from_str, QuantityUnit};

const CASCADE: &str = r#"{
    "FileType": "HillTau",
    "quantityUnits": "uM",
    "Groups": {
        "input": {
            "Species": { "Ca": 0.08, "CaM": 2.0 }
        },
        "kinase": {
            "Reacs": {
                "CaMCa4": { "subs": ["CaM", "Ca", "Ca", "Ca", "Ca"], "KA": 1.0, "tau": 1 },
                "inact":  { "subs": ["CaM", "CaMCa4"], "KA": 0.5, "tau": 5, "tau2": 20,
                            "baseline": 0.1, "inhibit": 1 }
            },
            "Eqns": { "total": "CaMCa4 + inact" }
        }
    }
}"#;

#[test]
fn cascade_builds_with_expected_depth() {
    let loaded = load_from_str(CASCADE).unwrap();
    assert_eq!(loaded.unit, QuantityUnit::Micromolar);
    let model = &loaded.model;
    assert_eq!(model.loops_broken(), 0);
    // Ca, CaM at 0; CaMCa4 at 1; inact at 2; total at 3.
    assert_eq!(model.sequence_depth(), 4);
}

#[test]
fn inhibitory_product_starts_from_its_steady_state() {
    let loaded = load_from_str(CASCADE).unwrap();
    let sim = Simulation::new(loaded.model, SimConfig::default()).unwrap();
    // CaMCa4 starts at its baseline (0), so inact sees zero ligand and
    // starts at baseline + CaM.
    let expected = 1e-4 + 2e-3;
    let inact = sim.conc_by_name("inact").unwrap();
    assert!((inact - expected).abs() < 1e-12, "inact = {inact}");
    let total = sim.conc_by_name("total").unwrap();
    assert!((total - expected).abs() < 1e-12);
}

#[test]
fn calcium_pulse_activates_and_recovers() {
    let loaded = load_from_str(CASCADE).unwrap();
    let scale = loaded.unit.scale();
    let mut sim = Simulation::new(loaded.model, SimConfig::for_runtime(200.0).unwrap()).unwrap();
    let mut q = StimulusQueue::new();
    let skipped = q.extend_lossy(
        &sim,
        [Stimulus::parse(&["Ca", "10", "20", "60"], 200.0, scale)],
    );
    assert_eq!(skipped, 0);
    let summary = q.run(&mut sim, 200.0);
    assert_eq!(summary.events_applied, 2);

    let camca4 = sim.history().series(sim.model().mol_id("CaMCa4").unwrap());
    assert_eq!(camca4.len(), 200);
    let before = camca4[19];
    let peak = camca4[59];
    let after = camca4[199];
    assert!(peak > 10.0 * before.max(1e-12));
    assert!(after < peak / 10.0);
}

#[test]
fn loads_from_file() {
    let path = std::env::temp_dir().join(format!("taukin-load-{}.json", std::process::id()));
    fs::write(&path, CASCADE).unwrap();
    let loaded = load_from_path(&path);
    let _ = fs::remove_file(&path);
    assert_eq!(loaded.unwrap().model.molecule_count(), 5);
}
