//! Core types for the taukin reduced-order kinetic simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the typed identifiers, the molecule table, reaction and equation
//! definitions, the equation expression language, and the build-time
//! error types used throughout the taukin workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod equation;
pub mod error;
pub mod expr;
pub mod id;
pub mod molecule;
pub mod reaction;

pub use equation::Equation;
pub use error::{BuildError, ExprError};
pub use expr::{BoundExpr, Expression, MAX_EXPR_DEPTH};
pub use id::{EqnId, MolId, Rank, ReacId};
pub use molecule::{Molecule, MoleculeClass, MoleculeTable};
pub use reaction::{Combination, LigandGroup, Polarity, Reaction, ReactionParams};
