//! Shared model fixtures for taukin tests and benchmarks.
//!
//! Every fixture returns a fully scheduled [`Model`]; wrap it in a
//! [`Simulation`](taukin_engine::Simulation) to run it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    chain, ligand_binding, relaxation, species_only, stimulus_target, three_cycle,
};

use taukin_engine::Model;

/// Assert two floats agree to `tol`, with a readable failure message.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}

/// Names of every molecule in `model`, in id order.
pub fn molecule_names(model: &Model) -> Vec<String> {
    model
        .molecules()
        .iter()
        .map(|(_, m)| m.name().to_string())
        .collect()
}
