//! taukin: a reduced-order kinetic simulator.
//!
//! Models are networks of molecules linked by saturating reactions that
//! relax toward their steady state with one or two time constants, plus
//! algebraic equations. This facade crate re-exports the public API of all
//! taukin sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use taukin::prelude::*;
//!
//! let mut b = ModelBuilder::new();
//! b.declare_molecule("L", "g", MoleculeClass::Species, Some(0.0)).unwrap();
//! b.declare_molecule("R", "g", MoleculeClass::Species, Some(1.0)).unwrap();
//! b.declare_molecule("LR", "g", MoleculeClass::Output, None).unwrap();
//! let mut m = b.finalize_indices();
//! m.declare_reaction("LR", "g", &["R", "L"], ReactionParams::new(0.5, 2.0)).unwrap();
//! let model = m.schedule_dependencies();
//!
//! let mut sim = Simulation::new(model, SimConfig::default()).unwrap();
//! let mut stimuli = StimulusQueue::new();
//! stimuli.push(&sim, &Stimulus::new("L", 0.5, 10.0, 30.0)).unwrap();
//! stimuli.run(&mut sim, 50.0);
//!
//! let lr = sim.model().mol_id("LR").unwrap();
//! let trace = sim.history().series(lr);
//! assert_eq!(trace.len(), 50);
//! assert!(trace[29] > 0.45 && trace[9] == 0.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `taukin-core` | IDs, molecules, reactions, equations, expressions, build errors |
//! | [`kinetics`] | `taukin-kinetics` | The `Kinetics` trait and the Hill/tau strategy |
//! | [`engine`] | `taukin-engine` | Model builder, scheduler, simulation, stimuli |
//! | [`model`] | `taukin-model` | JSON descriptions and unit scaling |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and build errors (`taukin-core`).
pub use taukin_core as types;

/// Reaction kinetics strategies (`taukin-kinetics`).
///
/// Implement [`kinetics::Kinetics`] to replace the default
/// [`kinetics::HillTau`] rule.
pub use taukin_kinetics as kinetics;

/// Model building, scheduling and simulation (`taukin-engine`).
pub use taukin_engine as engine;

/// JSON model descriptions (`taukin-model`).
///
/// [`model::load_from_path`] turns a description file into a scheduled
/// model in one call.
pub use taukin_model as model;

/// Common imports for typical taukin usage.
///
/// ```rust
/// use taukin::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use taukin_core::{
        Combination, EqnId, MolId, MoleculeClass, Polarity, Rank, ReacId, ReactionParams,
    };

    // Errors
    pub use taukin_core::BuildError;
    pub use taukin_engine::{ConfigError, StimulusError};
    pub use taukin_model::LoadError;

    // Kinetics
    pub use taukin_kinetics::{HillTau, Kinetics};

    // Engine
    pub use taukin_engine::{
        AdvanceMetrics, History, Model, ModelBuilder, SimConfig, Simulation, Stimulus,
        StimulusQueue,
    };

    // Descriptions
    pub use taukin_model::{load_from_path, load_from_str, LoadedModel};
}
