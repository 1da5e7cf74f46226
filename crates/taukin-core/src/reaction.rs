//! Reaction definitions.
//!
//! A reaction drives one product molecule toward a saturating steady
//! state computed from its substrates. The substrate list carries
//! structure: the first entry is the *reagent*, and the remaining entries
//! are grouped by name into *ligand groups* whose multiplicity is the
//! implicit Hill exponent. `["A", "L", "L"]` is reagent `A` with ligand
//! `L` at exponent 2.

use smallvec::SmallVec;
use std::fmt;

use crate::error::BuildError;
use crate::id::MolId;

/// Whether a reaction adds to or subtracts from its product.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Ligand binding raises the product.
    #[default]
    Excitatory,
    /// Ligand binding lowers the product.
    Inhibitory,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excitatory => write!(f, "excitatory"),
            Self::Inhibitory => write!(f, "inhibitory"),
        }
    }
}

/// How the saturation terms of several ligand groups are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Combination {
    /// All ligands are required: saturations multiply.
    #[default]
    Product,
    /// Ligands act independently: saturations are averaged.
    Sum,
}

/// Kinetic parameters of a reaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactionParams {
    /// Affinity constant. A half-saturation concentration for reactions
    /// with ligands; a dimensionless gain for single-substrate reactions.
    /// Must be positive.
    pub ka: f64,
    /// Time constant used while the product rises.
    pub tau: f64,
    /// Time constant used while the product falls. Defaults to `tau`.
    pub tau2: Option<f64>,
    /// Offset added to the steady-state target.
    pub baseline: f64,
    /// Excitatory or inhibitory action.
    pub polarity: Polarity,
    /// Explicit Hill exponent overriding ligand multiplicities.
    pub hill: Option<f64>,
    /// Rule for combining several ligand groups.
    pub combination: Combination,
}

impl ReactionParams {
    /// Excitatory parameters with a single time constant and no baseline.
    pub fn new(ka: f64, tau: f64) -> Self {
        Self {
            ka,
            tau,
            tau2: None,
            baseline: 0.0,
            polarity: Polarity::Excitatory,
            hill: None,
            combination: Combination::Product,
        }
    }

    /// Set a separate decay time constant.
    pub fn with_tau2(mut self, tau2: f64) -> Self {
        self.tau2 = Some(tau2);
        self
    }

    /// Set the baseline offset.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Make the reaction inhibitory.
    pub fn inhibitory(mut self) -> Self {
        self.polarity = Polarity::Inhibitory;
        self
    }

    /// Set an explicit Hill exponent.
    pub fn with_hill(mut self, n: f64) -> Self {
        self.hill = Some(n);
        self
    }

    /// Set the ligand combination rule.
    pub fn with_combination(mut self, combination: Combination) -> Self {
        self.combination = combination;
        self
    }

    /// Time constant while rising.
    pub fn rise_tau(&self) -> f64 {
        self.tau
    }

    /// Time constant while falling.
    pub fn decay_tau(&self) -> f64 {
        self.tau2.unwrap_or(self.tau)
    }

    fn validate(&self) -> Result<(), String> {
        if !self.ka.is_finite() || self.ka <= 0.0 {
            return Err(format!("KA must be finite and positive, got {}", self.ka));
        }
        if !self.tau.is_finite() || self.tau <= 0.0 {
            return Err(format!("tau must be finite and positive, got {}", self.tau));
        }
        if let Some(tau2) = self.tau2 {
            if !tau2.is_finite() || tau2 <= 0.0 {
                return Err(format!("tau2 must be finite and positive, got {tau2}"));
            }
        }
        if !self.baseline.is_finite() {
            return Err(format!("baseline must be finite, got {}", self.baseline));
        }
        if let Some(n) = self.hill {
            if !n.is_finite() || n <= 0.0 {
                return Err(format!("Hill exponent must be finite and positive, got {n}"));
            }
        }
        Ok(())
    }
}

/// A ligand and the number of times it appears in the substrate list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LigandGroup {
    /// The ligand molecule.
    pub mol: MolId,
    /// Implicit Hill exponent.
    pub multiplicity: u32,
}

/// A kinetic rule computing one molecule from others.
#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    name: String,
    group: String,
    substrates: SmallVec<[MolId; 4]>,
    product: MolId,
    params: ReactionParams,
    ligands: SmallVec<[LigandGroup; 2]>,
}

impl Reaction {
    /// Build a reaction, deriving its ligand groups.
    ///
    /// Fails if the substrate list is empty or a parameter is out of range.
    pub fn new(
        name: &str,
        group: &str,
        substrates: &[MolId],
        product: MolId,
        params: ReactionParams,
    ) -> Result<Self, BuildError> {
        let invalid = |reason: String| BuildError::InvalidReaction {
            name: name.to_string(),
            reason,
        };
        if substrates.is_empty() {
            return Err(invalid("no substrates".to_string()));
        }
        params.validate().map_err(invalid)?;

        let mut ligands: SmallVec<[LigandGroup; 2]> = SmallVec::new();
        for &mol in &substrates[1..] {
            match ligands.iter_mut().find(|g| g.mol == mol) {
                Some(g) => g.multiplicity += 1,
                None => ligands.push(LigandGroup {
                    mol,
                    multiplicity: 1,
                }),
            }
        }

        Ok(Self {
            name: name.to_string(),
            group: group.to_string(),
            substrates: substrates.iter().copied().collect(),
            product,
            params,
            ligands,
        })
    }

    /// Reaction name. Also the name of the product molecule.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace tag of the declaring group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Substrates in declaration order, repeats included.
    pub fn substrates(&self) -> &[MolId] {
        &self.substrates
    }

    /// The molecule this reaction writes.
    pub fn product(&self) -> MolId {
        self.product
    }

    /// Kinetic parameters.
    pub fn params(&self) -> &ReactionParams {
        &self.params
    }

    /// The first substrate.
    pub fn reagent(&self) -> MolId {
        self.substrates[0]
    }

    /// Ligand groups in first-appearance order. Empty for single-substrate
    /// reactions.
    pub fn ligands(&self) -> &[LigandGroup] {
        &self.ligands
    }

    /// Hill exponent applied to `ligand`.
    pub fn hill_exponent(&self, ligand: &LigandGroup) -> f64 {
        self.params
            .hill
            .unwrap_or_else(|| f64::from(ligand.multiplicity))
    }

    /// Distinct molecules this reaction reads, sorted by id.
    pub fn inputs(&self) -> SmallVec<[MolId; 4]> {
        let mut inputs = self.substrates.clone();
        inputs.sort_unstable();
        inputs.dedup();
        inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ligand_multiplicity_counts_repeats() {
        let r = Reaction::new(
            "P",
            "g",
            &[MolId(0), MolId(1), MolId(1)],
            MolId(2),
            ReactionParams::new(1.0, 1.0),
        )
        .unwrap();
        assert_eq!(r.reagent(), MolId(0));
        assert_eq!(
            r.ligands(),
            &[LigandGroup {
                mol: MolId(1),
                multiplicity: 2
            }]
        );
        assert_eq!(r.hill_exponent(&r.ligands()[0]), 2.0);
    }

    #[test]
    fn explicit_hill_overrides_multiplicity() {
        let r = Reaction::new(
            "P",
            "g",
            &[MolId(0), MolId(1)],
            MolId(2),
            ReactionParams::new(1.0, 1.0).with_hill(3.5),
        )
        .unwrap();
        assert_eq!(r.hill_exponent(&r.ligands()[0]), 3.5);
    }

    #[test]
    fn single_substrate_has_no_ligands() {
        let r = Reaction::new("P", "g", &[MolId(0)], MolId(1), ReactionParams::new(2.0, 1.0))
            .unwrap();
        assert!(r.ligands().is_empty());
        assert_eq!(r.inputs().as_slice(), &[MolId(0)]);
    }

    #[test]
    fn reagent_repeated_as_ligand_is_distinct_group() {
        let r = Reaction::new(
            "P",
            "g",
            &[MolId(3), MolId(3)],
            MolId(1),
            ReactionParams::new(1.0, 1.0),
        )
        .unwrap();
        assert_eq!(r.ligands().len(), 1);
        assert_eq!(r.inputs().as_slice(), &[MolId(3)]);
    }

    #[test]
    fn empty_substrates_rejected() {
        let err = Reaction::new("P", "g", &[], MolId(0), ReactionParams::new(1.0, 1.0));
        assert!(matches!(err, Err(BuildError::InvalidReaction { .. })));
    }

    #[test]
    fn non_positive_tau_rejected() {
        let err = Reaction::new("P", "g", &[MolId(0)], MolId(1), ReactionParams::new(1.0, 0.0));
        match err {
            Err(BuildError::InvalidReaction { name, reason }) => {
                assert_eq!(name, "P");
                assert!(reason.contains("tau"));
            }
            other => panic!("expected InvalidReaction, got {other:?}"),
        }
    }

    #[test]
    fn zero_ka_rejected() {
        for ka in [0.0, -1.0, f64::NAN] {
            let err = Reaction::new("P", "g", &[MolId(0)], MolId(1), ReactionParams::new(ka, 1.0));
            match err {
                Err(BuildError::InvalidReaction { name, reason }) => {
                    assert_eq!(name, "P");
                    assert!(reason.contains("KA"), "reason: {reason}");
                }
                other => panic!("expected InvalidReaction for KA = {ka}, got {other:?}"),
            }
        }
    }

    #[test]
    fn decay_tau_defaults_to_tau() {
        let p = ReactionParams::new(1.0, 4.0);
        assert_eq!(p.decay_tau(), 4.0);
        assert_eq!(p.with_tau2(9.0).decay_tau(), 9.0);
    }
}
