//! JSON model descriptions for taukin.
//!
//! A description is a document of named groups, each holding species
//! (initial concentrations), reactions and equations:
//!
//! ```json
//! {
//!   "quantityUnits": "uM",
//!   "Groups": {
//!     "signal": {
//!       "Species": { "L": 1.0, "R": 0.5 },
//!       "Reacs": { "LR": { "subs": ["R", "L"], "KA": 0.3, "tau": 2 } },
//!       "Eqns": { "free": "R - LR" }
//!     }
//!   }
//! }
//! ```
//!
//! [`ModelDescription`] is the serde form. [`load_from_path`] and
//! [`load_from_str`] parse, scale to the internal unit and build a
//! scheduled [`Model`](taukin_engine::Model) in one go.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod description;
pub mod error;
pub mod ingest;
pub mod units;

pub use description::{CombinationSpec, Flag, GroupSpec, ModelDescription, ReactionSpec};
pub use error::LoadError;
pub use ingest::{build_model, load_from_path, load_from_str, LoadedModel};
pub use units::{round_sig4, QuantityUnit};
