//! Benchmark models for the taukin simulator.
//!
//! [`layered_network`] generates a feed-forward reaction network from a
//! seed: the same seed always yields the same model, so benchmark runs are
//! comparable across machines and commits.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use taukin_core::{BuildError, Combination, MoleculeClass, ReactionParams};
use taukin_engine::{Model, ModelBuilder};

/// Shape of a generated network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkShape {
    /// Number of layers, including the species layer.
    pub layers: usize,
    /// Molecules per layer.
    pub width: usize,
}

impl NetworkShape {
    /// Small network for quick runs: 6 layers of 20.
    pub const SMALL: NetworkShape = NetworkShape {
        layers: 6,
        width: 20,
    };
    /// Reference network: 12 layers of 100.
    pub const REFERENCE: NetworkShape = NetworkShape {
        layers: 12,
        width: 100,
    };

    /// Reactions in a network of this shape.
    pub fn reaction_count(self) -> usize {
        self.layers.saturating_sub(1) * self.width
    }
}

/// Name of molecule `node` in `layer`.
pub fn node_name(layer: usize, node: usize) -> String {
    format!("l{layer:02}_n{node:03}")
}

/// Build a layered network.
///
/// Layer 0 holds species. Every molecule in a later layer is produced by a
/// reaction whose reagent and up to two ligands are drawn from the layer
/// above; about one in five reactions is inhibitory. Each layer past the
/// first also gets an equation summing its first two molecules, read by
/// nothing, so equation evaluation is part of every step. The equations
/// sit one rank above their layer.
pub fn layered_network(shape: NetworkShape, seed: u64) -> Result<Model, BuildError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut b = ModelBuilder::new();

    for node in 0..shape.width {
        let conc = rng.random_range(0.1..2.0);
        b.declare_molecule(&node_name(0, node), "L00", MoleculeClass::Species, Some(conc))?;
    }
    for layer in 1..shape.layers {
        let group = format!("L{layer:02}");
        for node in 0..shape.width {
            b.declare_molecule(&node_name(layer, node), &group, MoleculeClass::Output, None)?;
        }
        if shape.width >= 2 {
            b.declare_molecule(&sum_name(layer), &group, MoleculeClass::Output, None)?;
        }
    }

    let mut m = b.finalize_indices();
    for layer in 1..shape.layers {
        let group = format!("L{layer:02}");
        for node in 0..shape.width {
            let n_ligands = rng.random_range(0..=2usize);
            let subs: Vec<String> = (0..=n_ligands)
                .map(|_| node_name(layer - 1, rng.random_range(0..shape.width)))
                .collect();
            let sub_refs: Vec<&str> = subs.iter().map(String::as_str).collect();

            let mut params =
                ReactionParams::new(rng.random_range(0.1..2.0), rng.random_range(0.5..10.0))
                    .with_tau2(rng.random_range(0.5..20.0));
            if rng.random::<f64>() < 0.2 {
                params = params.inhibitory().with_baseline(rng.random_range(0.0..0.1));
            }
            if rng.random::<bool>() {
                params = params.with_combination(Combination::Sum);
            }
            m.declare_reaction(&node_name(layer, node), &group, &sub_refs, params)?;
        }
        if shape.width >= 2 {
            let expr = format!("{} + {}", node_name(layer, 0), node_name(layer, 1));
            m.declare_equation(&sum_name(layer), &group, &expr)?;
        }
    }
    Ok(m.schedule_dependencies())
}

fn sum_name(layer: usize) -> String {
    format!("sum{layer:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_network_has_expected_shape() {
        let model = layered_network(NetworkShape::SMALL, 7).unwrap();
        assert_eq!(model.reactions().len(), NetworkShape::SMALL.reaction_count());
        assert_eq!(model.equations().len(), NetworkShape::SMALL.layers - 1);
        assert_eq!(model.loops_broken(), 0);
        assert_eq!(model.sequence_depth(), NetworkShape::SMALL.layers + 1);
    }

    #[test]
    fn same_seed_same_model() {
        let a = layered_network(NetworkShape::SMALL, 42).unwrap();
        let b = layered_network(NetworkShape::SMALL, 42).unwrap();
        assert_eq!(a.conc_init(), b.conc_init());
        let subs = |m: &Model| -> Vec<Vec<u32>> {
            m.reactions()
                .iter()
                .map(|r| r.substrates().iter().map(|s| s.0).collect())
                .collect()
        };
        assert_eq!(subs(&a), subs(&b));
    }

    #[test]
    fn different_seeds_differ() {
        let a = layered_network(NetworkShape::SMALL, 1).unwrap();
        let b = layered_network(NetworkShape::SMALL, 2).unwrap();
        assert_ne!(a.conc_init(), b.conc_init());
    }
}
