//! Model domain types

pub mod axiom;
pub mod concept;
pub mod error;
pub mod literal;
pub mod operator;
pub mod role;

pub use axiom::Axiom;
pub use concept::{Concept, Conjunction, Datatype, Existential, NamedConcept};
pub use error::ModelError;
pub use literal::{
    BigIntegerLiteral, DateLiteral, DecimalLiteral, FloatLiteral, IntegerLiteral, Literal,
    LiteralKind, LongLiteral, StringLiteral,
};
pub use operator::Operator;
pub use role::{NamedFeature, NamedRole};
