//! Model error types

use super::literal::LiteralKind;
use thiserror::Error;

/// Errors raised while building or comparing model values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Literals of different kinds were compared
    #[error("Cannot compare {left} literal with {right} literal")]
    LiteralTypeMismatch { left: LiteralKind, right: LiteralKind },

    /// Operator symbol not recognised
    #[error("Unknown operator '{0}'. Valid operators: =, <, <=, >, >=")]
    UnknownOperator(String),
}
