//! Errors raised while loading a model description.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use taukin_core::BuildError;

/// Errors from reading, decoding, scaling or building a description.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The document is not valid JSON or does not match the schema.
    Json(serde_json::Error),
    /// `quantityUnits` names an unsupported unit.
    UnknownUnit {
        /// The tag as written.
        unit: String,
    },
    /// The description is structurally invalid.
    Build(BuildError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::Json(e) => write!(f, "invalid model description: {e}"),
            Self::UnknownUnit { unit } => write!(
                f,
                "unknown quantityUnits '{unit}' (expected one of M, mM, uM, nM, pM)"
            ),
            Self::Build(e) => write!(f, "model build failed: {e}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            Self::Build(e) => Some(e),
            Self::UnknownUnit { .. } => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<BuildError> for LoadError {
    fn from(e: BuildError) -> Self {
        Self::Build(e)
    }
}
