//! Literal values for datatype restrictions
//!
//! Every concrete literal type orders only against itself, so mixing kinds in
//! a comparison is a compile error for the concrete types. The [`Literal`] sum
//! type carries the dynamic case: [`Literal::compare`] reports a
//! [`ModelError::LiteralTypeMismatch`] and `PartialOrd` yields `None`.

use super::error::ModelError;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 32-bit integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntegerLiteral(i32);

impl IntegerLiteral {
    pub fn of(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// 64-bit integer literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LongLiteral(i64);

impl LongLiteral {
    pub fn of(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Single precision float literal
///
/// Equality and hashing use the bit pattern, ordering uses the IEEE 754
/// total order, so `NaN` and signed zeros get a stable place.
#[derive(Debug, Clone, Copy)]
pub struct FloatLiteral(f32);

impl FloatLiteral {
    pub fn of(value: f32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl PartialEq for FloatLiteral {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatLiteral {}

impl Hash for FloatLiteral {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for FloatLiteral {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatLiteral {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Arbitrary precision integer literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigIntegerLiteral(Arc<BigInt>);

impl BigIntegerLiteral {
    pub fn of(value: BigInt) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &BigInt {
        &self.0
    }
}

/// Arbitrary precision decimal literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecimalLiteral(Arc<BigDecimal>);

impl DecimalLiteral {
    pub fn of(value: BigDecimal) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &BigDecimal {
        &self.0
    }
}

/// Calendar date literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateLiteral(NaiveDate);

impl DateLiteral {
    pub fn of(value: NaiveDate) -> Self {
        Self(value)
    }

    pub fn value(&self) -> NaiveDate {
        self.0
    }
}

/// String literal (lexicographic order)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringLiteral(Arc<str>);

impl StringLiteral {
    pub fn of(value: &str) -> Self {
        Self(Arc::from(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Literal kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LiteralKind {
    Integer,
    Long,
    Float,
    BigInteger,
    Decimal,
    Date,
    String,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::Integer => "integer",
            LiteralKind::Long => "long",
            LiteralKind::Float => "float",
            LiteralKind::BigInteger => "big integer",
            LiteralKind::Decimal => "decimal",
            LiteralKind::Date => "date",
            LiteralKind::String => "string",
        };
        f.write_str(name)
    }
}

/// A literal value of any supported kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Integer(IntegerLiteral),
    Long(LongLiteral),
    Float(FloatLiteral),
    BigInteger(BigIntegerLiteral),
    Decimal(DecimalLiteral),
    Date(DateLiteral),
    String(StringLiteral),
}

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Integer(_) => LiteralKind::Integer,
            Literal::Long(_) => LiteralKind::Long,
            Literal::Float(_) => LiteralKind::Float,
            Literal::BigInteger(_) => LiteralKind::BigInteger,
            Literal::Decimal(_) => LiteralKind::Decimal,
            Literal::Date(_) => LiteralKind::Date,
            Literal::String(_) => LiteralKind::String,
        }
    }

    /// Compare two literals of the same kind
    ///
    /// # Errors
    /// [`ModelError::LiteralTypeMismatch`] when the kinds differ.
    pub fn compare(&self, other: &Literal) -> Result<Ordering, ModelError> {
        match (self, other) {
            (Literal::Integer(a), Literal::Integer(b)) => Ok(a.cmp(b)),
            (Literal::Long(a), Literal::Long(b)) => Ok(a.cmp(b)),
            (Literal::Float(a), Literal::Float(b)) => Ok(a.cmp(b)),
            (Literal::BigInteger(a), Literal::BigInteger(b)) => Ok(a.cmp(b)),
            (Literal::Decimal(a), Literal::Decimal(b)) => Ok(a.cmp(b)),
            (Literal::Date(a), Literal::Date(b)) => Ok(a.cmp(b)),
            (Literal::String(a), Literal::String(b)) => Ok(a.cmp(b)),
            _ => Err(ModelError::LiteralTypeMismatch {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(v) => write!(f, "{}", v.0),
            Literal::Long(v) => write!(f, "{}", v.0),
            Literal::Float(v) => write!(f, "{}", v.0),
            Literal::BigInteger(v) => write!(f, "{}", v.0),
            Literal::Decimal(v) => write!(f, "{}", v.0),
            Literal::Date(v) => write!(f, "{}", v.0),
            Literal::String(v) => write!(f, "{}", v.0),
        }
    }
}

impl From<IntegerLiteral> for Literal {
    fn from(v: IntegerLiteral) -> Self {
        Literal::Integer(v)
    }
}

impl From<LongLiteral> for Literal {
    fn from(v: LongLiteral) -> Self {
        Literal::Long(v)
    }
}

impl From<FloatLiteral> for Literal {
    fn from(v: FloatLiteral) -> Self {
        Literal::Float(v)
    }
}

impl From<BigIntegerLiteral> for Literal {
    fn from(v: BigIntegerLiteral) -> Self {
        Literal::BigInteger(v)
    }
}

impl From<DecimalLiteral> for Literal {
    fn from(v: DecimalLiteral) -> Self {
        Literal::Decimal(v)
    }
}

impl From<DateLiteral> for Literal {
    fn from(v: DateLiteral) -> Self {
        Literal::Date(v)
    }
}

impl From<StringLiteral> for Literal {
    fn from(v: StringLiteral) -> Self {
        Literal::String(v)
    }
}
