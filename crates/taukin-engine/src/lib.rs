//! Model scheduling and time-stepping engine for taukin simulations.
//!
//! Provides the three-phase [`ModelBuilder`] that turns declarations into
//! an immutable, rank-scheduled [`Model`], the [`Simulation`] that advances
//! it through time, and the [`StimulusQueue`] that drives a simulation
//! through scheduled external perturbations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod history;
pub mod metrics;
pub mod model;
pub mod schedule;
pub mod simulation;
pub mod stimulus;

pub use config::{ConfigError, SimConfig};
pub use history::History;
pub use metrics::AdvanceMetrics;
pub use model::{IndexedModel, Model, ModelBuilder};
pub use schedule::{Level, Schedule};
pub use simulation::{EngineState, Simulation};
pub use stimulus::{EventKind, RunSummary, Stimulus, StimulusError, StimulusEvent, StimulusQueue};
