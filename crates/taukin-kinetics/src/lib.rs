//! Reaction kinetics for taukin simulations.
//!
//! The [`Kinetics`] trait is the seam between the scheduler-driven engine
//! and the numeric rule that moves a reaction's product. [`HillTau`] is
//! the default rule: a saturating Hill-type steady state approached by
//! exact first-order relaxation with separate rise and decay constants.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod hill;
pub mod kinetics;

pub use hill::HillTau;
pub use kinetics::{relax_exponential, Kinetics};
