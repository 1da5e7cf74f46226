//! Reusable model fixtures.
//!
//! - [`chain`]: a linear cascade of single-substrate reactions.
//! - [`three_cycle`]: three reactions reading each other in a ring.
//! - [`relaxation`]: one product relaxing toward a fixed target.
//! - [`ligand_binding`]: a two-substrate saturating reaction.
//! - [`species_only`]: molecules with no reactions or equations.
//! - [`stimulus_target`]: a stimulated species feeding one response.

use taukin_core::{MoleculeClass, ReactionParams};
use taukin_engine::{Model, ModelBuilder};

/// Name of the `k`-th molecule of a [`chain`]; `chain_name(0)` is the
/// driving species.
pub fn chain_name(k: usize) -> String {
    format!("m{k:02}")
}

/// `m00` (species, 1.0) → `m01` → … → `m{depth}`.
///
/// Each link has unit gain and `tau = 1`, so every product settles at 1.
/// Reactions are declared in reverse order to exercise scheduling.
pub fn chain(depth: usize) -> Model {
    let mut b = ModelBuilder::new();
    b.declare_molecule(&chain_name(0), "chain", MoleculeClass::Species, Some(1.0))
        .unwrap();
    for k in 1..=depth {
        b.declare_molecule(&chain_name(k), "chain", MoleculeClass::Output, None)
            .unwrap();
    }
    let mut m = b.finalize_indices();
    for k in (1..=depth).rev() {
        let sub = chain_name(k - 1);
        m.declare_reaction(
            &chain_name(k),
            "chain",
            &[sub.as_str()],
            ReactionParams::new(1.0, 1.0),
        )
        .unwrap();
    }
    m.schedule_dependencies()
}

/// `A` reads `C`, `B` reads `A`, `C` reads `B`.
pub fn three_cycle() -> Model {
    let mut b = ModelBuilder::new();
    for name in ["A", "B", "C"] {
        b.declare_molecule(name, "ring", MoleculeClass::Output, None)
            .unwrap();
    }
    let mut m = b.finalize_indices();
    for (name, sub) in [("A", "C"), ("B", "A"), ("C", "B")] {
        m.declare_reaction(
            name,
            "ring",
            &[sub],
            ReactionParams::new(1.0, 1.0).with_baseline(0.1),
        )
        .unwrap();
    }
    m.schedule_dependencies()
}

/// Species `A` at `a`; product `P` with gain `ka` and time constant `tau`.
///
/// Steady state of `P` is `ka * a`.
pub fn relaxation(a: f64, ka: f64, tau: f64) -> Model {
    let mut b = ModelBuilder::new();
    b.declare_molecule("A", "relax", MoleculeClass::Species, Some(a))
        .unwrap();
    b.declare_molecule("P", "relax", MoleculeClass::Output, None)
        .unwrap();
    let mut m = b.finalize_indices();
    m.declare_reaction("P", "relax", &["A"], ReactionParams::new(ka, tau))
        .unwrap();
    m.schedule_dependencies()
}

/// `R` (receptor, `r`) binds `L` (ligand, `l`) with affinity `ka`.
///
/// Steady state of `RL` is `r * l / (l + ka)`.
pub fn ligand_binding(r: f64, l: f64, ka: f64) -> Model {
    let mut b = ModelBuilder::new();
    b.declare_molecule("R", "bind", MoleculeClass::Species, Some(r))
        .unwrap();
    b.declare_molecule("L", "bind", MoleculeClass::Species, Some(l))
        .unwrap();
    b.declare_molecule("RL", "bind", MoleculeClass::Output, None)
        .unwrap();
    let mut m = b.finalize_indices();
    m.declare_reaction(
        "RL",
        "bind",
        &["R", "L"],
        ReactionParams::new(ka, 2.0).with_tau2(5.0),
    )
    .unwrap();
    m.schedule_dependencies()
}

/// Species only, no reactions or equations.
pub fn species_only(species: &[(&str, f64)]) -> Model {
    let mut b = ModelBuilder::new();
    for &(name, c) in species {
        b.declare_molecule(name, "inert", MoleculeClass::Species, Some(c))
            .unwrap();
    }
    b.finalize_indices().schedule_dependencies()
}

/// Species `stim` (initially 0) and a fast response `resp = stim`.
pub fn stimulus_target() -> Model {
    let mut b = ModelBuilder::new();
    b.declare_molecule("stim", "io", MoleculeClass::Species, Some(0.0))
        .unwrap();
    b.declare_molecule("resp", "io", MoleculeClass::Output, None)
        .unwrap();
    let mut m = b.finalize_indices();
    m.declare_reaction("resp", "io", &["stim"], ReactionParams::new(1.0, 0.1))
        .unwrap();
    m.schedule_dependencies()
}
