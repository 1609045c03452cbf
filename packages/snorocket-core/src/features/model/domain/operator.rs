//! Comparison operators for datatype restrictions

use super::error::ModelError;
use std::cmp::Ordering;
use std::fmt;

/// Datatype restriction operator
///
/// Declaration order is the tie-break order used when concepts are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    Equals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
}

impl Operator {
    /// Parse operator from its symbol
    pub fn from_symbol(symbol: &str) -> Result<Self, ModelError> {
        match symbol.trim() {
            "=" | "==" => Ok(Operator::Equals),
            "<" => Ok(Operator::LessThan),
            "<=" => Ok(Operator::LessThanEquals),
            ">" => Ok(Operator::GreaterThan),
            ">=" => Ok(Operator::GreaterThanEquals),
            other => Err(ModelError::UnknownOperator(other.to_string())),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::LessThan => "<",
            Operator::LessThanEquals => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEquals => ">=",
        }
    }

    /// Does a value satisfy `value <op> bound`, given `value.cmp(bound)`?
    #[inline]
    pub fn accepts(&self, value_vs_bound: Ordering) -> bool {
        match self {
            Operator::Equals => value_vs_bound == Ordering::Equal,
            Operator::LessThan => value_vs_bound == Ordering::Less,
            Operator::LessThanEquals => value_vs_bound != Ordering::Greater,
            Operator::GreaterThan => value_vs_bound == Ordering::Greater,
            Operator::GreaterThanEquals => value_vs_bound != Ordering::Less,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip() {
        for op in [
            Operator::Equals,
            Operator::LessThan,
            Operator::LessThanEquals,
            Operator::GreaterThan,
            Operator::GreaterThanEquals,
        ] {
            assert_eq!(Operator::from_symbol(op.symbol()).unwrap(), op);
        }
        assert!(matches!(
            Operator::from_symbol("~"),
            Err(ModelError::UnknownOperator(_))
        ));
    }

    #[test]
    fn test_accepts() {
        assert!(Operator::LessThanEquals.accepts(Ordering::Equal));
        assert!(!Operator::LessThan.accepts(Ordering::Equal));
        assert!(Operator::GreaterThan.accepts(Ordering::Greater));
        assert!(!Operator::Equals.accepts(Ordering::Less));
    }
}
