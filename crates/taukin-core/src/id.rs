//! Strongly-typed identifiers and the evaluation [`Rank`].

use std::fmt;

/// Identifies a molecule by its position in the dense concentration vector.
///
/// Assigned once, in declaration order, when the molecule table is
/// finalized. `MolId(n)` indexes the n-th entry of every per-molecule
/// vector (concentrations, reinit snapshot, ranks, history columns).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MolId(pub u32);

impl MolId {
    /// The id as a vector index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MolId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a reaction in the reaction registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReacId(pub u32);

impl ReacId {
    /// The id as a vector index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ReacId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies an equation in the equation registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EqnId(pub u32);

impl EqnId {
    /// The id as a vector index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EqnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved evaluation level of a molecule.
///
/// Species (and anything else with no upstream producer) sit at rank 0.
/// A reaction or equation output sits strictly above every input it reads,
/// except where the scheduler had to force a rank to break a cycle.
/// An unresolved molecule is represented as `Option<Rank>::None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rank(pub u32);

impl Rank {
    /// Rank of independent quantities.
    pub const SPECIES: Rank = Rank(0);

    /// The rank immediately above this one.
    #[inline]
    pub fn next(self) -> Rank {
        Rank(self.0 + 1)
    }

    /// The rank as a level index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
