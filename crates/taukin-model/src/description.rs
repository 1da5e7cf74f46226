//! The serde form of a model description.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use taukin_core::{Combination, ReactionParams};

use crate::error::LoadError;
use crate::units::{round_sig4, QuantityUnit};

/// A whole model description document.
///
/// Group, species, reaction and equation maps keep document order, which
/// fixes molecule ids and hence column order in every output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    /// Concentration unit of every concentration-valued field.
    #[serde(
        rename = "quantityUnits",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity_units: Option<String>,
    /// Named groups.
    #[serde(rename = "Groups", default)]
    pub groups: IndexMap<String, GroupSpec>,
}

/// One named group of species, reactions and equations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Species name to initial concentration.
    #[serde(rename = "Species", default, skip_serializing_if = "IndexMap::is_empty")]
    pub species: IndexMap<String, f64>,
    /// Reaction (and product) name to reaction parameters.
    #[serde(rename = "Reacs", default, skip_serializing_if = "IndexMap::is_empty")]
    pub reacs: IndexMap<String, ReactionSpec>,
    /// Left-hand molecule name to expression.
    #[serde(rename = "Eqns", default, skip_serializing_if = "IndexMap::is_empty")]
    pub eqns: IndexMap<String, String>,
}

/// A boolean written either as `true`/`false` or as a number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    /// `true` or `false`.
    Bool(bool),
    /// Non-zero means set.
    Number(f64),
}

impl Flag {
    /// Whether the flag is set.
    pub fn is_set(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Number(n) => n != 0.0,
        }
    }
}

/// How ligand saturations combine, as written in descriptions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinationSpec {
    /// Product of saturations.
    #[default]
    Product,
    /// Mean of saturations.
    Sum,
}

impl From<CombinationSpec> for Combination {
    fn from(c: CombinationSpec) -> Self {
        match c {
            CombinationSpec::Product => Combination::Product,
            CombinationSpec::Sum => Combination::Sum,
        }
    }
}

/// Parameters of one reaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactionSpec {
    /// Substrate names; the first is the reagent.
    pub subs: Vec<String>,
    /// Affinity constant (or dimensionless gain for one substrate).
    #[serde(rename = "KA")]
    pub ka: f64,
    /// Rise time constant.
    pub tau: f64,
    /// Decay time constant; defaults to `tau`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau2: Option<f64>,
    /// Baseline offset of the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    /// Inhibitory polarity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inhibit: Option<Flag>,
    /// Explicit Hill exponent for every ligand group.
    #[serde(
        default,
        alias = "hill",
        rename = "n",
        skip_serializing_if = "Option::is_none"
    )]
    pub n: Option<f64>,
    /// Combination rule for multiple ligand groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination: Option<CombinationSpec>,
}

impl ReactionSpec {
    /// Kinetic parameters, unvalidated. Validation happens when the
    /// reaction is declared.
    pub fn params(&self) -> ReactionParams {
        let mut p = ReactionParams::new(self.ka, self.tau);
        if let Some(tau2) = self.tau2 {
            p = p.with_tau2(tau2);
        }
        if let Some(bl) = self.baseline {
            p = p.with_baseline(bl);
        }
        if self.inhibit.is_some_and(Flag::is_set) {
            p = p.inhibitory();
        }
        if let Some(n) = self.n {
            p = p.with_hill(n);
        }
        if let Some(c) = self.combination {
            p = p.with_combination(c.into());
        }
        p
    }
}

impl ModelDescription {
    /// Parse a JSON document.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The declared unit, millimolar when absent.
    pub fn quantity_unit(&self) -> Result<QuantityUnit, LoadError> {
        self.quantity_units
            .as_deref()
            .map_or(Ok(QuantityUnit::default()), str::parse::<QuantityUnit>)
    }

    /// Convert every concentration-valued field to millimolar.
    ///
    /// Species, baselines and multi-substrate affinities are multiplied by
    /// `scale`; single-substrate affinities are gains and are not. Every
    /// touched value, time constants included, is rounded to four
    /// significant figures.
    pub fn scale_to_internal(&mut self, scale: f64) {
        for group in self.groups.values_mut() {
            for conc in group.species.values_mut() {
                *conc = round_sig4(*conc * scale);
            }
            for reac in group.reacs.values_mut() {
                reac.ka = if reac.subs.len() == 1 {
                    round_sig4(reac.ka)
                } else {
                    round_sig4(reac.ka * scale)
                };
                reac.tau = round_sig4(reac.tau);
                reac.tau2 = reac.tau2.map(round_sig4);
                reac.baseline = reac.baseline.map(|b| round_sig4(b * scale));
            }
        }
    }

    /// Total counts of species, reactions and equations over all groups.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.groups.values().fold((0, 0, 0), |(s, r, e), g| {
            (s + g.species.len(), r + g.reacs.len(), e + g.eqns.len())
        })
    }
}
