//! The default Hill-type steady state with tau relaxation.
//!
//! For a reaction with reagent `A` and ligand groups `L_i` with exponents
//! `n_i`:
//!
//! ```text
//! s_i = L_i^n_i / (L_i^n_i + KA^n_i)
//! S   = prod(s_i)            (Combination::Product)
//!     = sum(s_i) / k         (Combination::Sum, k ligand groups)
//!
//! excitatory: target = baseline + A * S
//! inhibitory: target = baseline + A * (1 - S)
//! ```
//!
//! A single-substrate reaction has no ligand: `KA` is a dimensionless gain
//! and the target is `baseline + KA * A` (excitatory) or
//! `max(0, baseline - KA * A)` (inhibitory).

use taukin_core::{Combination, Polarity, Reaction};

use crate::kinetics::Kinetics;

/// Hill-type saturating steady state, relaxed with one or two time
/// constants.
#[derive(Clone, Copy, Debug, Default)]
pub struct HillTau;

impl HillTau {
    /// Create the strategy.
    pub fn new() -> Self {
        Self
    }

    fn saturation(ligand: f64, ka: f64, n: f64) -> f64 {
        let h = ligand.max(0.0).powf(n);
        let kh = ka.powf(n);
        let denom = h + kh;
        if denom > 0.0 {
            h / denom
        } else {
            0.0
        }
    }

    /// Combined saturation of all ligand groups, in `[0, 1]`.
    pub fn combined_saturation(&self, reaction: &Reaction, conc: &[f64]) -> f64 {
        let params = reaction.params();
        let ligands = reaction.ligands();
        let terms = ligands.iter().map(|g| {
            Self::saturation(conc[g.mol.index()], params.ka, reaction.hill_exponent(g))
        });
        match params.combination {
            Combination::Product => terms.product::<f64>(),
            Combination::Sum => terms.sum::<f64>() / ligands.len() as f64,
        }
    }
}

impl Kinetics for HillTau {
    fn name(&self) -> &str {
        "hill-tau"
    }

    fn steady_state(&self, reaction: &Reaction, conc: &[f64]) -> f64 {
        let params = reaction.params();
        let reagent = conc[reaction.reagent().index()];

        if reaction.ligands().is_empty() {
            let contribution = params.ka * reagent;
            return match params.polarity {
                Polarity::Excitatory => params.baseline + contribution,
                Polarity::Inhibitory => (params.baseline - contribution).max(0.0),
            };
        }

        let s = self.combined_saturation(reaction, conc);
        match params.polarity {
            Polarity::Excitatory => params.baseline + reagent * s,
            Polarity::Inhibitory => params.baseline + reagent * (1.0 - s),
        }
    }
}
