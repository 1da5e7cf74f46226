//! Auxiliary algebraic equations.
//!
//! An equation assigns its left-hand molecule from an expression every
//! step, with no relaxation delay.

use crate::error::BuildError;
use crate::expr::{BoundExpr, Expression};
use crate::id::MolId;
use crate::molecule::MoleculeTable;

/// An algebraic rule computing one molecule directly from others.
#[derive(Clone, Debug, PartialEq)]
pub struct Equation {
    name: String,
    group: String,
    lhs: MolId,
    source: String,
    expr: BoundExpr,
}

impl Equation {
    /// Parse `source` and resolve it against `molecules`.
    ///
    /// The left-hand name and every name in the expression must already
    /// be declared in the table.
    pub fn new(
        lhs: &str,
        group: &str,
        source: &str,
        molecules: &MoleculeTable,
    ) -> Result<Self, BuildError> {
        let lhs_id = molecules.require(lhs, lhs)?;
        let parsed = Expression::parse(source).map_err(|e| BuildError::InvalidExpression {
            name: lhs.to_string(),
            source: e,
        })?;
        let expr = parsed.bind(|name| molecules.require(lhs, name))?;
        Ok(Self {
            name: lhs.to_string(),
            group: group.to_string(),
            lhs: lhs_id,
            source: source.to_string(),
            expr,
        })
    }

    /// Name of the left-hand molecule.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace tag of the declaring group.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The molecule this equation writes.
    pub fn lhs(&self) -> MolId {
        self.lhs
    }

    /// Expression source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct molecules read, sorted by id.
    pub fn inputs(&self) -> &[MolId] {
        self.expr.inputs()
    }

    /// Evaluate the right-hand side.
    pub fn eval(&self, conc: &[f64]) -> f64 {
        self.expr.eval(conc)
    }
}
