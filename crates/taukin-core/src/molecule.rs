//! The molecule table: every named scalar quantity in a model.
//!
//! Names are unique across the whole model regardless of group. The
//! table is filled while a model description is scanned; the same name
//! usually turns up several times (as a substrate, as a reaction or
//! equation output, as an explicit species) and [`MoleculeTable::declare`]
//! keeps the most specific classification it has seen.
//!
//! Positions in the table are stable: an entry keeps the slot of its first
//! declaration even when a later, more specific declaration overwrites it.
//! Once every name is known the slot becomes the molecule's [`MolId`].

use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt;

use crate::error::BuildError;
use crate::id::MolId;

/// How a molecule entered the table, from least to most specific.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoleculeClass {
    /// Inferred from a reaction's substrate list.
    Substrate,
    /// Inferred as the output of a reaction or equation.
    Output,
    /// Explicitly declared species with an initial concentration.
    Species,
}

impl fmt::Display for MoleculeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substrate => write!(f, "substrate"),
            Self::Output => write!(f, "output"),
            Self::Species => write!(f, "species"),
        }
    }
}

/// A named scalar quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct Molecule {
    name: String,
    group: String,
    class: MoleculeClass,
    conc_init: f64,
}

impl Molecule {
    /// Unique molecule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace tag of the declaring group. Informational only.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Most specific classification seen so far.
    pub fn class(&self) -> MoleculeClass {
        self.class
    }

    /// Concentration restored on reinitialization.
    pub fn conc_init(&self) -> f64 {
        self.conc_init
    }

    /// Whether the molecule was declared as an explicit species.
    pub fn is_species(&self) -> bool {
        self.class == MoleculeClass::Species
    }
}

/// Insertion-ordered table of unique molecule names.
#[derive(Clone, Debug, Default)]
pub struct MoleculeTable {
    entries: IndexMap<String, Molecule>,
}

impl MoleculeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a molecule, or refine an existing declaration.
    ///
    /// - A new name is appended with the given classification.
    /// - A strictly more specific class overwrites group, class and
    ///   initial concentration in place (the slot is kept).
    /// - An equal class is idempotent, except that two species with
    ///   different initial concentrations conflict.
    /// - A less specific class is ignored.
    ///
    /// Returns the slot the name occupies.
    pub fn declare(
        &mut self,
        name: &str,
        group: &str,
        class: MoleculeClass,
        conc_init: Option<f64>,
    ) -> Result<MolId, BuildError> {
        let conc_init = conc_init.unwrap_or(0.0);
        let slot = match self.entries.entry(name.to_string()) {
            Entry::Vacant(v) => {
                let slot = v.index();
                v.insert(Molecule {
                    name: name.to_string(),
                    group: group.to_string(),
                    class,
                    conc_init,
                });
                slot
            }
            Entry::Occupied(mut o) => {
                let slot = o.index();
                let existing = o.get_mut();
                if class > existing.class {
                    existing.group = group.to_string();
                    existing.class = class;
                    existing.conc_init = conc_init;
                } else if class == existing.class
                    && class == MoleculeClass::Species
                    && existing.conc_init.to_bits() != conc_init.to_bits()
                {
                    return Err(BuildError::DuplicateMolecule {
                        name: name.to_string(),
                        class,
                    });
                }
                slot
            }
        };
        Ok(MolId(slot as u32))
    }

    /// Number of unique molecules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a molecule's id by name.
    pub fn id(&self, name: &str) -> Option<MolId> {
        self.entries.get_index_of(name).map(|i| MolId(i as u32))
    }

    /// Look up a molecule's id by name, reporting `referrer` if missing.
    pub fn require(&self, referrer: &str, name: &str) -> Result<MolId, BuildError> {
        self.id(name).ok_or_else(|| BuildError::UndeclaredMolecule {
            referrer: referrer.to_string(),
            name: name.to_string(),
        })
    }

    /// The molecule at `id`, if in range.
    pub fn get(&self, id: MolId) -> Option<&Molecule> {
        self.entries.get_index(id.index()).map(|(_, m)| m)
    }

    /// The molecule named `name`, if declared.
    pub fn by_name(&self, name: &str) -> Option<&Molecule> {
        self.entries.get(name)
    }

    /// Iterate `(id, molecule)` in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (MolId, &Molecule)> {
        self.entries
            .values()
            .enumerate()
            .map(|(i, m)| (MolId(i as u32), m))
    }

    /// Dense vector of initial concentrations, indexed by [`MolId`].
    pub fn conc_init_vector(&self) -> Vec<f64> {
        self.entries.values().map(|m| m.conc_init).collect()
    }
}
