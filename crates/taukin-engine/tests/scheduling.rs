//! Integration test: dependency scheduling on fixture models.

use taukin_core::Rank;
use taukin_engine::{SimConfig, Simulation};
use taukin_test_utils::fixtures::chain_name;
use taukin_test_utils::{chain, three_cycle};

#[test]
fn acyclic_chain_ranks_strictly_increase() {
    let model = chain(5);
    assert_eq!(model.loops_broken(), 0);
    assert_eq!(model.sequence_depth(), 6);
    for r in model.reactions() {
        let out = model.rank(r.product()).unwrap();
        for &s in r.substrates() {
            assert!(out > model.rank(s).unwrap(), "{} not above its input", r.name());
        }
    }
    for k in 0..=5 {
        let id = model.mol_id(&chain_name(k)).unwrap();
        assert_eq!(model.rank(id), Some(Rank(k as u32)));
    }
}

#[test]
fn levels_hold_one_reaction_each_in_chain() {
    let model = chain(4);
    let levels = model.schedule().levels();
    assert!(levels[0].is_empty());
    for level in &levels[1..] {
        assert_eq!(level.reactions.len(), 1);
        assert!(level.equations.is_empty());
    }
}

#[test]
fn three_cycle_reports_exactly_one_broken_loop() {
    let model = three_cycle();
    assert_eq!(model.loops_broken(), 1);
    assert_eq!(model.schedule().forced(), &["A".to_string()]);
    let rank = |n: &str| model.rank(model.mol_id(n).unwrap()).unwrap();
    assert_eq!((rank("A"), rank("B"), rank("C")), (Rank(1), Rank(2), Rank(3)));
}

#[test]
fn cyclic_model_still_simulates() {
    let mut sim = Simulation::new(three_cycle(), SimConfig::default()).unwrap();
    let m = sim.advance(10.0, false);
    assert_eq!(m.steps, 10);
    assert_eq!(m.reactions_evaluated, 30);
    assert!(sim.concentrations().iter().all(|c| c.is_finite()));
}
