//! Model construction: declaration, indexing, and scheduling.
//!
//! Construction is split into three phases, each its own type, so that an
//! operation can only be called in the phase where it is meaningful:
//!
//! 1. [`ModelBuilder`]: declare molecules. Names are merged by
//!    classification (substrate, output, species).
//! 2. [`IndexedModel`]: the molecule table is frozen and every name has a
//!    dense [`MolId`]. Reactions and equations are declared against it.
//! 3. [`Model`]: dependency ranks are resolved and the level plan is
//!    fixed. The model is immutable from here on.
//!
//! ```
//! use taukin_core::{MoleculeClass, ReactionParams};
//! use taukin_engine::ModelBuilder;
//!
//! let mut b = ModelBuilder::new();
//! b.declare_molecule("L", "g", MoleculeClass::Species, Some(1.0)).unwrap();
//! b.declare_molecule("R", "g", MoleculeClass::Species, Some(2.0)).unwrap();
//! b.declare_molecule("LR", "g", MoleculeClass::Output, None).unwrap();
//! let mut m = b.finalize_indices();
//! m.declare_reaction("LR", "g", &["R", "L"], ReactionParams::new(0.5, 1.0)).unwrap();
//! let model = m.schedule_dependencies();
//! assert_eq!(model.sequence_depth(), 2);
//! ```

use indexmap::IndexMap;
use tracing::info;

use taukin_core::{
    BuildError, EqnId, Equation, MolId, MoleculeClass, MoleculeTable, Rank, ReacId, Reaction,
    ReactionParams,
};

use crate::schedule::{schedule, DependencyGraph, Producer, ProducerKind, Schedule};

// ── Phase 1: declaration ───────────────────────────────────────────

/// Collects molecule declarations.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    molecules: MoleculeTable,
}

impl ModelBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or re-declare) a molecule.
    ///
    /// See [`MoleculeTable::declare`] for the merge rules.
    pub fn declare_molecule(
        &mut self,
        name: &str,
        group: &str,
        class: MoleculeClass,
        conc_init: Option<f64>,
    ) -> Result<MolId, BuildError> {
        self.molecules.declare(name, group, class, conc_init)
    }

    /// Number of molecules declared so far.
    pub fn molecule_count(&self) -> usize {
        self.molecules.len()
    }

    /// Freeze the molecule table and move to reaction declaration.
    pub fn finalize_indices(self) -> IndexedModel {
        IndexedModel {
            molecules: self.molecules,
            reactions: IndexMap::new(),
            equations: IndexMap::new(),
        }
    }
}

// ── Phase 2: reactions and equations ───────────────────────────────

/// A model whose molecules have dense ids, accepting reactions and
/// equations.
#[derive(Debug)]
pub struct IndexedModel {
    molecules: MoleculeTable,
    reactions: IndexMap<String, Reaction>,
    equations: IndexMap<String, Equation>,
}

impl IndexedModel {
    /// The frozen molecule table.
    pub fn molecules(&self) -> &MoleculeTable {
        &self.molecules
    }

    /// Declare a reaction producing the molecule called `name`.
    ///
    /// The first substrate is the reagent; the rest are ligands, and a
    /// name repeated `n` times contributes a Hill exponent of `n`. Every
    /// name, including the product, must already be declared.
    pub fn declare_reaction(
        &mut self,
        name: &str,
        group: &str,
        substrates: &[&str],
        params: ReactionParams,
    ) -> Result<ReacId, BuildError> {
        if self.reactions.contains_key(name) {
            return Err(BuildError::DuplicateReaction {
                name: name.to_string(),
            });
        }
        if self.equations.contains_key(name) {
            return Err(BuildError::ConflictingOutput {
                name: name.to_string(),
            });
        }
        let product = self.molecules.require(name, name)?;
        let subs = substrates
            .iter()
            .map(|s| self.molecules.require(name, s))
            .collect::<Result<Vec<_>, _>>()?;
        let reaction = Reaction::new(name, group, &subs, product, params)?;
        let id = ReacId(self.reactions.len() as u32);
        self.reactions.insert(name.to_string(), reaction);
        Ok(id)
    }

    /// Declare an equation assigning `lhs` from `expr` every step.
    pub fn declare_equation(
        &mut self,
        lhs: &str,
        group: &str,
        expr: &str,
    ) -> Result<EqnId, BuildError> {
        if self.equations.contains_key(lhs) {
            return Err(BuildError::DuplicateEquation {
                name: lhs.to_string(),
            });
        }
        if self.reactions.contains_key(lhs) {
            return Err(BuildError::ConflictingOutput {
                name: lhs.to_string(),
            });
        }
        let equation = Equation::new(lhs, group, expr, &self.molecules)?;
        let id = EqnId(self.equations.len() as u32);
        self.equations.insert(lhs.to_string(), equation);
        Ok(id)
    }

    /// Resolve evaluation ranks and freeze the model.
    ///
    /// Never fails: dependency cycles are broken and counted in
    /// [`Model::loops_broken`].
    pub fn schedule_dependencies(self) -> Model {
        let mut producers = Vec::with_capacity(self.reactions.len() + self.equations.len());
        for (i, r) in self.reactions.values().enumerate() {
            producers.push(Producer {
                name: r.name().to_string(),
                kind: ProducerKind::Reaction(ReacId(i as u32)),
                output: r.product(),
                inputs: r.inputs(),
            });
        }
        for (i, e) in self.equations.values().enumerate() {
            producers.push(Producer {
                name: e.name().to_string(),
                kind: ProducerKind::Equation(EqnId(i as u32)),
                output: e.lhs(),
                inputs: e.inputs().iter().copied().collect(),
            });
        }

        // Only molecules something actually writes wait for a rank.
        let mut initial: Vec<Option<Rank>> = vec![Some(Rank::SPECIES); self.molecules.len()];
        for p in &producers {
            if let Some(m) = self.molecules.get(p.output) {
                if !m.is_species() {
                    initial[p.output.index()] = None;
                }
            }
        }

        let schedule = schedule(&DependencyGraph { initial, producers });
        info!(
            molecules = self.molecules.len(),
            reactions = self.reactions.len(),
            equations = self.equations.len(),
            depth = schedule.depth(),
            loops_broken = schedule.loops_broken(),
            "model scheduled"
        );

        Model {
            molecules: self.molecules,
            reactions: self.reactions.into_values().collect(),
            equations: self.equations.into_values().collect(),
            schedule,
        }
    }
}

// ── Phase 3: the immutable model ───────────────────────────────────

/// A fully scheduled model.
///
/// Immutable once built. Simulations share it behind an `Arc`.
#[derive(Clone, Debug)]
pub struct Model {
    molecules: MoleculeTable,
    reactions: Vec<Reaction>,
    equations: Vec<Equation>,
    schedule: Schedule,
}

impl Model {
    /// The molecule table.
    pub fn molecules(&self) -> &MoleculeTable {
        &self.molecules
    }

    /// Number of molecules (the width of every concentration vector).
    pub fn molecule_count(&self) -> usize {
        self.molecules.len()
    }

    /// Look up a molecule id by name.
    pub fn mol_id(&self, name: &str) -> Option<MolId> {
        self.molecules.id(name)
    }

    /// All reactions, indexed by [`ReacId`].
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// One reaction.
    pub fn reaction(&self, id: ReacId) -> Option<&Reaction> {
        self.reactions.get(id.index())
    }

    /// All equations, indexed by [`EqnId`].
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// One equation.
    pub fn equation(&self, id: EqnId) -> Option<&Equation> {
        self.equations.get(id.index())
    }

    /// The resolved evaluation plan.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Resolved rank of a molecule.
    pub fn rank(&self, mol: MolId) -> Option<Rank> {
        self.schedule.rank(mol)
    }

    /// Number of distinct ranks that hold reactions or equations.
    pub fn sequence_depth(&self) -> usize {
        self.schedule.depth()
    }

    /// Number of dependency cycles broken during scheduling.
    pub fn loops_broken(&self) -> usize {
        self.schedule.loops_broken()
    }

    /// Declared initial concentrations, indexed by [`MolId`].
    pub fn conc_init(&self) -> Vec<f64> {
        self.molecules.conc_init_vector()
    }
}
