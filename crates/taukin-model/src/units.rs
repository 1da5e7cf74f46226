//! Quantity units and the four-significant-figure rounding applied when
//! a description is scaled to the internal unit (millimolar).

use std::fmt;
use std::str::FromStr;

use crate::error::LoadError;

/// Concentration unit tag of a description.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuantityUnit {
    /// Molar.
    Molar,
    /// Millimolar, the internal unit.
    #[default]
    Millimolar,
    /// Micromolar.
    Micromolar,
    /// Nanomolar.
    Nanomolar,
    /// Picomolar.
    Picomolar,
}

impl QuantityUnit {
    /// Factor converting a value in this unit to millimolar.
    pub fn scale(self) -> f64 {
        match self {
            Self::Molar => 1000.0,
            Self::Millimolar => 1.0,
            Self::Micromolar => 1e-3,
            Self::Nanomolar => 1e-6,
            Self::Picomolar => 1e-9,
        }
    }

    /// The tag as written in descriptions.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Molar => "M",
            Self::Millimolar => "mM",
            Self::Micromolar => "uM",
            Self::Nanomolar => "nM",
            Self::Picomolar => "pM",
        }
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for QuantityUnit {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::Molar),
            "mM" => Ok(Self::Millimolar),
            "uM" => Ok(Self::Micromolar),
            "nM" => Ok(Self::Nanomolar),
            "pM" => Ok(Self::Picomolar),
            other => Err(LoadError::UnknownUnit {
                unit: other.to_string(),
            }),
        }
    }
}

/// Round to four significant figures.
///
/// Zero and non-finite values are returned unchanged.
pub fn round_sig4(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    format!("{x:.3e}").parse().unwrap_or(x)
}
