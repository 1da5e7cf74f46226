//! Description → scheduled model.
//!
//! Molecules are declared in three sweeps over all groups so that the
//! most specific declaration of a name wins regardless of where it
//! appears: reaction substrates first, then equation left-hand sides and
//! reaction products, then explicit species. Reactions and equations are
//! declared once every molecule has an id.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use taukin_core::MoleculeClass;
use taukin_engine::{Model, ModelBuilder};

use crate::description::ModelDescription;
use crate::error::LoadError;
use crate::units::QuantityUnit;

/// A built model together with the unit its description was written in.
#[derive(Clone, Debug)]
pub struct LoadedModel {
    /// The scheduled model, in millimolar.
    pub model: Model,
    /// The description's unit; divide by its scale to report values in it.
    pub unit: QuantityUnit,
}

/// Build a model from a description already scaled to millimolar.
pub fn build_model(desc: &ModelDescription) -> Result<Model, LoadError> {
    let mut b = ModelBuilder::new();

    for (group, spec) in &desc.groups {
        for reac in spec.reacs.values() {
            for sub in &reac.subs {
                b.declare_molecule(sub, group, MoleculeClass::Substrate, None)?;
            }
        }
    }
    for (group, spec) in &desc.groups {
        for lhs in spec.eqns.keys() {
            b.declare_molecule(lhs, group, MoleculeClass::Output, None)?;
        }
        for name in spec.reacs.keys() {
            b.declare_molecule(name, group, MoleculeClass::Output, None)?;
        }
    }
    for (group, spec) in &desc.groups {
        for (name, &conc) in &spec.species {
            b.declare_molecule(name, group, MoleculeClass::Species, Some(conc))?;
        }
    }
    debug!(molecules = b.molecule_count(), "molecules declared");

    let mut m = b.finalize_indices();
    for (group, spec) in &desc.groups {
        for (name, reac) in &spec.reacs {
            let subs: Vec<&str> = reac.subs.iter().map(String::as_str).collect();
            m.declare_reaction(name, group, &subs, reac.params())?;
        }
    }
    for (group, spec) in &desc.groups {
        for (lhs, expr) in &spec.eqns {
            m.declare_equation(lhs, group, expr)?;
        }
    }
    Ok(m.schedule_dependencies())
}

/// Parse, scale and build a JSON description.
pub fn load_from_str(text: &str) -> Result<LoadedModel, LoadError> {
    let mut desc = ModelDescription::from_json(text)?;
    let unit = desc.quantity_unit()?;
    desc.scale_to_internal(unit.scale());
    let model = build_model(&desc)?;
    Ok(LoadedModel { model, unit })
}

/// Read, parse, scale and build a JSON description file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<LoadedModel, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = load_from_str(&text)?;
    info!(
        path = %path.display(),
        unit = %loaded.unit,
        molecules = loaded.model.molecule_count(),
        "model loaded"
    );
    Ok(loaded)
}
