//! Error types for model construction.
//!
//! Structural errors abort the build: a model is either fully built or
//! not built at all. Every variant names the offending molecule,
//! reaction or equation so the message can be shown to the user as is.

use std::error::Error;
use std::fmt;

use crate::molecule::MoleculeClass;

/// Errors detected while declaring molecules, reactions and equations.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildError {
    /// A reaction or equation references a name that was never declared.
    UndeclaredMolecule {
        /// The reaction or equation holding the reference.
        referrer: String,
        /// The missing molecule name.
        name: String,
    },
    /// A molecule was declared twice with incompatible definitions.
    DuplicateMolecule {
        /// The molecule name.
        name: String,
        /// Classification of the conflicting declarations.
        class: MoleculeClass,
    },
    /// Two reactions share a name.
    DuplicateReaction {
        /// The reaction name.
        name: String,
    },
    /// Two equations assign the same left-hand molecule.
    DuplicateEquation {
        /// The left-hand molecule name.
        name: String,
    },
    /// A molecule is produced both by a reaction and by an equation.
    ConflictingOutput {
        /// The molecule name.
        name: String,
    },
    /// A reaction's parameters or substrate list are unusable.
    InvalidReaction {
        /// The reaction name.
        name: String,
        /// Description of the problem.
        reason: String,
    },
    /// An equation's expression failed to parse.
    InvalidExpression {
        /// The left-hand molecule name of the equation.
        name: String,
        /// The underlying parse error.
        source: ExprError,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeclaredMolecule { referrer, name } => {
                write!(f, "'{referrer}' references undeclared molecule '{name}'")
            }
            Self::DuplicateMolecule { name, class } => {
                write!(f, "molecule '{name}' declared twice as {class} with different values")
            }
            Self::DuplicateReaction { name } => write!(f, "reaction '{name}' declared twice"),
            Self::DuplicateEquation { name } => {
                write!(f, "equation for '{name}' declared twice")
            }
            Self::ConflictingOutput { name } => {
                write!(f, "'{name}' is produced by both a reaction and an equation")
            }
            Self::InvalidReaction { name, reason } => {
                write!(f, "invalid reaction '{name}': {reason}")
            }
            Self::InvalidExpression { name, source } => {
                write!(f, "invalid equation for '{name}': {source}")
            }
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidExpression { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors from parsing an equation expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprError {
    /// The input is empty or contains only whitespace.
    Empty,
    /// A character sequence that is not a valid token.
    InvalidToken {
        /// Byte offset of the token.
        position: usize,
        /// The offending text.
        text: String,
    },
    /// A token appeared where it is not allowed.
    UnexpectedToken {
        /// Byte offset of the token.
        position: usize,
        /// What the parser was looking for.
        expected: &'static str,
        /// The token text that was found.
        found: String,
    },
    /// The input ended in the middle of an expression.
    UnexpectedEnd {
        /// What the parser was looking for.
        expected: &'static str,
    },
    /// A call to a function the expression language does not provide,
    /// or with the wrong number of arguments.
    UnknownFunction {
        /// The function name.
        name: String,
        /// Number of arguments supplied.
        arity: usize,
    },
    /// Nesting or operator chaining exceeds [`MAX_EXPR_DEPTH`].
    ///
    /// [`MAX_EXPR_DEPTH`]: crate::expr::MAX_EXPR_DEPTH
    TooDeep {
        /// Byte offset where the limit was reached.
        position: usize,
    },
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty expression"),
            Self::InvalidToken { position, text } => {
                write!(f, "invalid token '{text}' at offset {position}")
            }
            Self::UnexpectedToken {
                position,
                expected,
                found,
            } => write!(f, "expected {expected} at offset {position}, found '{found}'"),
            Self::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of expression, expected {expected}")
            }
            Self::UnknownFunction { name, arity } => {
                write!(f, "unknown function '{name}' with {arity} argument(s)")
            }
            Self::TooDeep { position } => write!(
                f,
                "expression nested deeper than {} levels at offset {position}",
                crate::expr::MAX_EXPR_DEPTH
            ),
        }
    }
}

impl Error for ExprError {}
